//! Confidence scoring.
//!
//! Additive score over a 0.5 base, capped at [`CONFIDENCE_CEILING`].

use serde::{Deserialize, Serialize};

use super::extractor::contains_any;
use super::signals::{STRONG_ACTION_TERMS, STRONG_DOMAIN_TERMS};
use super::types::{QueryAction, QueryDomain, QueryFilters};

/// Highest confidence ever reported.
pub const CONFIDENCE_CEILING: f64 = 0.95;

const BASE: f64 = 0.5;
const STRONG_DOMAIN_BOOST: f64 = 0.2;
const STRONG_ACTION_BOOST: f64 = 0.15;
const LOCATION_BOOST: f64 = 0.1;
const EXPLICIT_TIMEFRAME_BOOST: f64 = 0.05;
const SHORT_QUERY_PENALTY: f64 = 0.2;
const SHORT_QUERY_CHARS: usize = 5;

/// Lower bound applied after scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceFloor {
    /// No lower bound; the score may go negative.
    #[default]
    Unbounded,
    /// Clamp at 0.0.
    Zero,
}

/// Computes interpretation confidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceScorer {
    floor: ConfidenceFloor,
}

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_floor(floor: ConfidenceFloor) -> Self {
        Self { floor }
    }

    pub fn floor(&self) -> ConfidenceFloor {
        self.floor
    }

    /// Score an interpretation of normalized `query`.
    ///
    /// Domain and action are accepted for future weighting; the current
    /// score depends only on the text and the filters.
    pub fn score(
        &self,
        query: &str,
        _domain: QueryDomain,
        _action: QueryAction,
        filters: &QueryFilters,
    ) -> f64 {
        let mut confidence = BASE;

        if contains_any(query, &STRONG_DOMAIN_TERMS) {
            confidence += STRONG_DOMAIN_BOOST;
        }
        if contains_any(query, &STRONG_ACTION_TERMS) {
            confidence += STRONG_ACTION_BOOST;
        }
        if filters.location.is_some() {
            confidence += LOCATION_BOOST;
        }
        if !filters.timeframe.is_default() {
            confidence += EXPLICIT_TIMEFRAME_BOOST;
        }
        if query.chars().count() < SHORT_QUERY_CHARS {
            confidence -= SHORT_QUERY_PENALTY;
        }

        let confidence = confidence.min(CONFIDENCE_CEILING);
        match self.floor {
            ConfidenceFloor::Unbounded => confidence,
            ConfidenceFloor::Zero => confidence.max(0.0),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::Timeframe;

    fn score(query: &str, filters: &QueryFilters) -> f64 {
        ConfidenceScorer::new().score(
            query,
            QueryDomain::default(),
            QueryAction::default(),
            filters,
        )
    }

    #[test]
    fn test_base_score() {
        assert_eq!(score("how are reviews", &QueryFilters::new()), 0.5);
    }

    #[test]
    fn test_empty_query_penalized() {
        assert_eq!(score("", &QueryFilters::new()), 0.3);
        let zero_floor = ConfidenceScorer::with_floor(ConfidenceFloor::Zero);
        assert_eq!(
            zero_floor.score("", QueryDomain::Sentiment, QueryAction::Summarize, &QueryFilters::new()),
            0.3
        );
    }

    #[test]
    fn test_boosts_accumulate() {
        let filters = QueryFilters::new()
            .with_location("Downtown")
            .with_timeframe(Timeframe::LastWeek);
        let value = score("sentiment trend downtown last week", &filters);
        // 0.5 + 0.2 + 0.15 + 0.1 + 0.05 = 1.0, capped
        assert_eq!(value, CONFIDENCE_CEILING);
    }

    #[test]
    fn test_explicit_timeframe_boost() {
        let filters = QueryFilters::new().with_timeframe(Timeframe::AllTime);
        assert!((score("reviews all time", &filters) - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_short_query_counts_chars_not_bytes() {
        // four characters, eight bytes
        assert_eq!(score("éééé", &QueryFilters::new()), 0.3);
        assert_eq!(score("abcde", &QueryFilters::new()), 0.5);
    }

    #[test]
    fn test_floor_policy_serde() {
        let floor: ConfidenceFloor = serde_json::from_str("\"zero\"").unwrap();
        assert_eq!(floor, ConfidenceFloor::Zero);
        assert_eq!(ConfidenceFloor::default(), ConfidenceFloor::Unbounded);
    }
}
