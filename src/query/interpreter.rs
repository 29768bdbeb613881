//! Query interpreter.
//!
//! Turns free text into a [`QueryIntent`]: classify, extract filters, score,
//! explain. Interpretation is total; any input (including the empty string)
//! yields an intent, with low confidence when the text carries no signal.

use std::sync::Arc;
use std::time::Instant;

use crate::metrics::get_metrics;

use super::classifier::IntentClassifier;
use super::confidence::{ConfidenceFloor, ConfidenceScorer};
use super::context::ConversationContext;
use super::extractor::FilterExtractor;
use super::reasoning::explain;
use super::signals::SignalTable;
use super::types::QueryIntent;

/// Confidence below which an interpretation is reported as low.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Natural language query interpreter.
pub struct QueryInterpreter {
    classifier: IntentClassifier,
    extractor: FilterExtractor,
    scorer: ConfidenceScorer,
    low_confidence_threshold: f64,
}

impl Default for QueryInterpreter {
    fn default() -> Self {
        Self {
            classifier: IntentClassifier::default(),
            extractor: FilterExtractor::default(),
            scorer: ConfidenceScorer::default(),
            low_confidence_threshold: LOW_CONFIDENCE_THRESHOLD,
        }
    }
}

impl QueryInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom signal table for classification.
    pub fn with_signals(mut self, signals: Arc<SignalTable>) -> Self {
        self.classifier = IntentClassifier::with_signals(signals);
        self
    }

    /// Choose the confidence floor policy.
    pub fn with_confidence_floor(mut self, floor: ConfidenceFloor) -> Self {
        self.scorer = ConfidenceScorer::with_floor(floor);
        self
    }

    /// Confidence below which an interpretation counts as low in metrics.
    pub fn with_low_confidence_threshold(mut self, threshold: f64) -> Self {
        self.low_confidence_threshold = threshold;
        self
    }

    pub fn low_confidence_threshold(&self) -> f64 {
        self.low_confidence_threshold
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Parse a query and append the result to `context`.
    ///
    /// The append happens after the intent is fully built, so the returned
    /// value is the same as [`QueryInterpreter::interpret`] would give.
    pub fn parse_query(
        &self,
        query: &str,
        conversation_history: Option<Vec<String>>,
        context: &ConversationContext,
    ) -> QueryIntent {
        let intent = self.interpret(query, conversation_history);
        context.record(intent.clone());
        intent
    }

    /// Parse a query without touching any conversation store.
    pub fn interpret(&self, query: &str, conversation_history: Option<Vec<String>>) -> QueryIntent {
        let start = Instant::now();
        let normalized = normalize(query);

        let domain = self.classifier.detect_domain(&normalized);
        let action = self.classifier.detect_action(&normalized);
        let filters = self.extractor.extract(&normalized);
        let confidence = self.scorer.score(&normalized, domain, action, &filters);
        let reasoning = explain(&normalized, domain, action, &filters, confidence);

        tracing::debug!(
            domain = domain.as_str(),
            action = action.as_str(),
            timeframe = filters.timeframe.as_str(),
            confidence,
            "interpreted query"
        );

        let metrics = get_metrics();
        metrics.record_interpretation(
            domain,
            confidence,
            self.low_confidence_threshold,
            start.elapsed(),
        );

        QueryIntent {
            domain,
            action,
            filters,
            confidence,
            original_query: query.to_string(),
            conversation_context: conversation_history,
            reasoning,
        }
    }
}

/// Lower-case and trim.
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

// ============================================================================
// Tests
// ============================================================================
