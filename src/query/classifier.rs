//! Query Intent Classifier.
//!
//! Picks one domain and one action for a normalized review question by
//! scoring every candidate against the lexical signal table.

use std::sync::Arc;

use super::signals::SignalTable;
use super::types::*;

// ============================================================================
// Intent Classifier
// ============================================================================

/// Scores domains and actions against a [`SignalTable`].
///
/// Candidates are visited in table order and the running best is replaced
/// only on a strictly higher score, so ties resolve to the earliest entry.
pub struct IntentClassifier {
    signals: Arc<SignalTable>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier over the built-in signal table.
    pub fn new() -> Self {
        Self {
            signals: SignalTable::standard(),
        }
    }

    /// Create a classifier over a custom signal table.
    pub fn with_signals(signals: Arc<SignalTable>) -> Self {
        Self { signals }
    }

    /// Detect the semantic domain. Defaults to sentiment when nothing fires.
    pub fn detect_domain(&self, query: &str) -> QueryDomain {
        let mut best = QueryDomain::default();
        let mut best_score = 0;

        for signals in &self.signals.domains {
            let score = signals.score(query);
            if score > best_score {
                best_score = score;
                best = signals.domain;
            }
        }

        tracing::trace!(domain = best.as_str(), score = best_score, "domain detected");
        best
    }

    /// Detect the requested action. Defaults to summarize when nothing fires.
    pub fn detect_action(&self, query: &str) -> QueryAction {
        let mut best = QueryAction::default();
        let mut best_score = 0;

        for signals in &self.signals.actions {
            let score = signals.score(query);
            if score > best_score {
                best_score = score;
                best = signals.action;
            }
        }

        tracing::trace!(action = best.as_str(), score = best_score, "action detected");
        best
    }

    /// Per-domain scores in table order, for diagnostics.
    pub fn domain_scores(&self, query: &str) -> Vec<(QueryDomain, u32)> {
        self.signals
            .domains
            .iter()
            .map(|s| (s.domain, s.score(query)))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::signals::{ActionSignals, DomainSignals, SubstringSignal};

    #[test]
    fn test_defaults_when_nothing_fires() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.detect_domain(""), QueryDomain::Sentiment);
        assert_eq!(classifier.detect_action(""), QueryAction::Summarize);
        assert_eq!(classifier.detect_domain("xyz"), QueryDomain::Sentiment);
    }

    #[test]
    fn test_loyalty_domain() {
        let classifier = IntentClassifier::new();
        // loyalty: keywords loyalty, points, award + patterns loyalty.*, points.* = 7
        let query = "how many loyalty points awarded this month?";
        assert_eq!(classifier.detect_domain(query), QueryDomain::Loyalty);
        assert_eq!(classifier.detect_action(query), QueryAction::Calculate);
    }

    #[test]
    fn test_comparison_beats_platforms() {
        let classifier = IntentClassifier::new();
        let query = "compare google vs yelp performance";
        let scores = classifier.domain_scores(query);
        assert!(scores.contains(&(QueryDomain::Platforms, 4)));
        assert!(scores.contains(&(QueryDomain::Comparison, 8)));
        assert_eq!(classifier.detect_domain(query), QueryDomain::Comparison);
        assert_eq!(classifier.detect_action(query), QueryAction::Compare);
    }

    #[test]
    fn test_in_pattern_pulls_towards_communities() {
        let classifier = IntentClassifier::new();
        // sentiment scores 1, communities scores 3 (westside + "in.*")
        let query = "what's our sentiment in westside?";
        assert_eq!(classifier.detect_domain(query), QueryDomain::Communities);
    }

    #[test]
    fn test_anomaly_domain() {
        let classifier = IntentClassifier::new();
        let query = "why did ratings drop so much? something is wrong";
        assert_eq!(classifier.detect_domain(query), QueryDomain::Anomaly);
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        let table = SignalTable {
            domains: vec![
                DomainSignals::new(QueryDomain::Themes).with_keywords(&["alpha"]),
                DomainSignals::new(QueryDomain::Anomaly).with_keywords(&["beta"]),
            ],
            actions: vec![
                ActionSignals::new(QueryAction::Rank, &["alpha"]),
                ActionSignals::new(QueryAction::Predict, &["beta"]),
            ],
        };
        let classifier = IntentClassifier::with_signals(Arc::new(table));

        assert_eq!(classifier.detect_domain("beta alpha"), QueryDomain::Themes);
        assert_eq!(classifier.detect_action("beta alpha"), QueryAction::Rank);
        assert_eq!(classifier.detect_domain("beta"), QueryDomain::Anomaly);
    }

    #[test]
    fn test_custom_matcher() {
        let table = SignalTable {
            domains: vec![DomainSignals::new(QueryDomain::Forecast)
                .with_pattern(SubstringSignal::new("tomorrow"))],
            actions: Vec::new(),
        };
        let classifier = IntentClassifier::with_signals(Arc::new(table));
        assert_eq!(classifier.detect_domain("ratings tomorrow"), QueryDomain::Forecast);
        assert_eq!(classifier.detect_action("ratings tomorrow"), QueryAction::Summarize);
    }
}
