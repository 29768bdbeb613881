//! Reasoning explainer.
//!
//! Renders an interpretation as an ordered, pipe-delimited sentence so the
//! user can see what was understood and how sure the interpreter is.

use super::types::{QueryAction, QueryDomain, QueryFilters};

const SEPARATOR: &str = " | ";

/// Confidence band boundaries.
const HIGH_CONFIDENCE: f64 = 0.8;
const MODERATE_CONFIDENCE: f64 = 0.6;

/// Build the explanation for an interpretation.
///
/// Clause order: domain, action, location, platform, timeframe, confidence.
pub fn explain(
    _query: &str,
    domain: QueryDomain,
    action: QueryAction,
    filters: &QueryFilters,
    confidence: f64,
) -> String {
    let mut parts = Vec::with_capacity(6);

    parts.push(format!("Understood as: {}", domain.display_name()));
    parts.push(format!("You want to: {}", action.display_name()));

    if let Some(ref location) = filters.location {
        parts.push(format!("Filtered to: {}", location));
    }
    if let Some(ref platform) = filters.platform {
        parts.push(format!("For platform: {}", platform));
    }
    parts.push(format!("Looking at: {}", filters.timeframe.readable()));

    parts.push(format!(
        "{} ({}%)",
        confidence_band(confidence),
        (confidence * 100.0) as i64
    ));

    parts.join(SEPARATOR)
}

/// Wording for a confidence value.
pub fn confidence_band(confidence: f64) -> &'static str {
    if confidence >= HIGH_CONFIDENCE {
        "High confidence"
    } else if confidence >= MODERATE_CONFIDENCE {
        "Moderate confidence"
    } else {
        "Low confidence - might need clarification"
    }
}
