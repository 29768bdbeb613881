//! Filter extraction.
//!
//! Pulls location, platform, timeframe and theme keywords out of normalized
//! query text. Each field is extracted independently and never fails.

use crate::utils::title_case;

use super::signals::{
    LOCATIONS, PARKING_KEYWORDS, PARKING_TERMS, PLATFORMS, STAFF_KEYWORDS, STAFF_TERMS,
    TIMEFRAME_PATTERNS,
};
use super::types::{QueryFilters, Timeframe};

/// Extracts [`QueryFilters`] from normalized query text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterExtractor;

impl FilterExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all filters from a query.
    pub fn extract(&self, query: &str) -> QueryFilters {
        QueryFilters {
            location: extract_location(query),
            platform: extract_platform(query),
            timeframe: extract_timeframe(query),
            keywords: extract_keywords(query),
            sentiment_range: None,
            min_mention_count: None,
        }
    }
}

// ============================================================================
// Field Extraction
// ============================================================================

/// First listed area found in the text, title-cased.
fn extract_location(query: &str) -> Option<String> {
    first_match(query, &LOCATIONS).map(title_case)
}

/// First listed channel found in the text, title-cased.
fn extract_platform(query: &str) -> Option<String> {
    first_match(query, &PLATFORMS).map(title_case)
}

/// Last timeframe row with a matching phrase; `last_30d` if none match.
///
/// A later row overrides an earlier one, so "last week vs the quarter"
/// resolves to `last_90d`.
fn extract_timeframe(query: &str) -> Timeframe {
    let mut timeframe = None;
    for (candidate, phrases) in TIMEFRAME_PATTERNS.iter() {
        if phrases.iter().any(|p| query.contains(p)) {
            timeframe = Some(*candidate);
        }
    }
    timeframe.unwrap_or_default()
}

/// Theme tags. A staff/service mention replaces a parking mention rather
/// than adding to it.
fn extract_keywords(query: &str) -> Option<Vec<String>> {
    let mut keywords = None;
    if contains_any(query, &PARKING_TERMS) {
        keywords = Some(to_strings(&PARKING_KEYWORDS));
    }
    if contains_any(query, &STAFF_TERMS) {
        keywords = Some(to_strings(&STAFF_KEYWORDS));
    }
    keywords
}

// ============================================================================
// Helpers
// ============================================================================

fn first_match<'a>(query: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|c| query.contains(c))
}

pub(crate) fn contains_any(query: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| query.contains(t))
}

fn to_strings(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| (*t).to_string()).collect()
}

// ============================================================================
// Tests
// ============================================================================
