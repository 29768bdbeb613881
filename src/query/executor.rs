//! Query Executor.
//!
//! Interprets a question, runs the derived query against a review data
//! source, and shapes the outcome for a persona.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::{get_metrics, Metrics};
use crate::response::{FormattedResponse, Persona, ResponseFormatter};

use super::context::ConversationContext;
use super::interpreter::QueryInterpreter;
use super::signals::{LOCATIONS, PLATFORMS};
use super::types::*;

/// Number of prior queries handed to the interpreter as history.
pub const HISTORY_WINDOW: usize = 5;

// ============================================================================
// Data Source
// ============================================================================

/// Anything that can answer a [`DerivedQuery`].
#[async_trait]
pub trait ReviewDataSource: Send + Sync {
    /// Run the query and return result data plus ordered insights.
    async fn execute(&self, query: &DerivedQuery) -> Result<QueryOutcome>;

    /// Short name used in stats and logs.
    fn name(&self) -> &str {
        "reviews"
    }
}

// ============================================================================
// Results
// ============================================================================

/// Timing for one executed query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStats {
    pub interpretation_time_ms: u64,
    pub execution_time_ms: u64,
    pub total_time_ms: u64,
    pub data_source: String,
}

/// Everything produced for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutedQuery {
    pub intent: QueryIntent,
    pub derived: DerivedQuery,
    pub response: FormattedResponse,
    pub stats: QueryStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

// ============================================================================
// Query Executor
// ============================================================================

/// Executes natural language review questions end to end.
pub struct QueryExecutor {
    interpreter: QueryInterpreter,
    source: Arc<dyn ReviewDataSource>,
    context: Arc<ConversationContext>,
    default_persona: Persona,
}

impl QueryExecutor {
    /// Create a new query executor with a fresh conversation context.
    pub fn new(interpreter: QueryInterpreter, source: Arc<dyn ReviewDataSource>) -> Self {
        Self {
            interpreter,
            source,
            context: Arc::new(ConversationContext::new()),
            default_persona: Persona::default(),
        }
    }

    /// Share an existing conversation context.
    pub fn with_context(mut self, context: Arc<ConversationContext>) -> Self {
        self.context = context;
        self
    }

    pub fn with_default_persona(mut self, persona: Persona) -> Self {
        self.default_persona = persona;
        self
    }

    /// Set the low-confidence threshold used for warnings, suggestions and
    /// metrics.
    pub fn with_low_confidence_threshold(mut self, threshold: f64) -> Self {
        self.interpreter = self.interpreter.with_low_confidence_threshold(threshold);
        self
    }

    pub fn context(&self) -> &Arc<ConversationContext> {
        &self.context
    }

    /// Execute a natural language question.
    ///
    /// The recent queries in the conversation context are passed along as
    /// history, and the new intent is appended to it.
    pub async fn execute(&self, query: &str, persona: Option<Persona>) -> Result<ExecutedQuery> {
        let total_start = Instant::now();
        let persona = persona.unwrap_or(self.default_persona);

        let interp_start = Instant::now();
        let history = self.context.recent_queries(HISTORY_WINDOW);
        let history = (!history.is_empty()).then_some(history);
        let intent = self.interpreter.parse_query(query, history, &self.context);
        let interpretation_time = interp_start.elapsed().as_millis() as u64;

        if intent.confidence < self.interpreter.low_confidence_threshold() {
            tracing::warn!(
                query = %query,
                confidence = intent.confidence,
                "low confidence interpretation"
            );
        }

        let derived = DerivedQuery::from_intent(&intent);
        let metrics = get_metrics();
        let exec_start = Instant::now();
        let outcome = {
            let _timer = Metrics::start_timer(&metrics.execution_duration_seconds);
            self.source.execute(&derived).await
        };
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                metrics.data_source_errors_total.inc();
                tracing::error!(
                    source = self.source.name(),
                    query = %derived.description,
                    error = %e,
                    "data source failed"
                );
                return Err(e);
            }
        };
        let execution_time = exec_start.elapsed().as_millis() as u64;

        let response =
            ResponseFormatter::format(&intent, &outcome.data, &outcome.insights, persona);
        let suggestions = self.generate_suggestions(&intent);

        let stats = QueryStats {
            interpretation_time_ms: interpretation_time,
            execution_time_ms: execution_time,
            total_time_ms: total_start.elapsed().as_millis() as u64,
            data_source: self.source.name().to_string(),
        };

        tracing::info!(
            domain = intent.domain.as_str(),
            action = intent.action.as_str(),
            persona = persona.as_str(),
            total_ms = stats.total_time_ms,
            "query executed"
        );

        Ok(ExecutedQuery {
            intent,
            derived,
            response,
            stats,
            suggestions,
        })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn generate_suggestions(&self, intent: &QueryIntent) -> Vec<String> {
        if intent.confidence >= self.interpreter.low_confidence_threshold() {
            return Vec::new();
        }

        let mut suggestions = Vec::new();
        let normalized = super::interpreter::normalize(&intent.original_query);

        // Runner-up domains that also had signal
        let mut alternatives: Vec<(QueryDomain, u32)> = self
            .interpreter
            .classifier()
            .domain_scores(&normalized)
            .into_iter()
            .filter(|(domain, score)| *score > 0 && *domain != intent.domain)
            .collect();
        alternatives.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some((domain, _)) = alternatives.first() {
            suggestions.push(format!("Did you mean {}?", domain.display_name()));
        }

        if intent.filters.location.is_none() {
            suggestions.push(format!(
                "Try naming a location: {}",
                title_list(&LOCATIONS)
            ));
        }
        if intent.filters.platform.is_none() {
            suggestions.push(format!(
                "Try naming a platform: {}",
                title_list(&PLATFORMS)
            ));
        }
        if intent.filters.timeframe.is_default() {
            suggestions.push("Try adding a timeframe, e.g. \"last week\" or \"this year\"".to_string());
        }

        suggestions.truncate(3);
        suggestions
    }
}

fn title_list(terms: &[&str]) -> String {
    terms
        .iter()
        .map(|t| crate::utils::title_case(t))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Tests
// ============================================================================
