//! Lexical signal tables.
//!
//! Static keyword and pattern lists that drive classification and filter
//! extraction. Pattern matching goes through [`SignalMatcher`] so a table can
//! be rebuilt with different matchers in tests or for another vertical.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::types::{QueryAction, QueryDomain, Timeframe};

// ============================================================================
// Matchers
// ============================================================================

/// A structural signal tested against normalized query text.
pub trait SignalMatcher: Send + Sync {
    /// Whether the signal fires anywhere in `text`.
    fn is_match(&self, text: &str) -> bool;

    /// Pattern source, for logging.
    fn source(&self) -> &str;
}

/// Unanchored regex search.
#[derive(Debug, Clone)]
pub struct RegexSignal {
    regex: Regex,
}

impl RegexSignal {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl SignalMatcher for RegexSignal {
    fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    fn source(&self) -> &str {
        self.regex.as_str()
    }
}

/// Plain substring containment.
#[derive(Debug, Clone)]
pub struct SubstringSignal {
    needle: String,
}

impl SubstringSignal {
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
        }
    }
}

impl SignalMatcher for SubstringSignal {
    fn is_match(&self, text: &str) -> bool {
        text.contains(&self.needle)
    }

    fn source(&self) -> &str {
        &self.needle
    }
}

// ============================================================================
// Signal Table
// ============================================================================

/// Keyword and pattern signals for one domain.
pub struct DomainSignals {
    pub domain: QueryDomain,
    pub keywords: Vec<String>,
    pub patterns: Vec<Box<dyn SignalMatcher>>,
}

impl DomainSignals {
    pub fn new(domain: QueryDomain) -> Self {
        Self {
            domain,
            keywords: Vec::new(),
            patterns: Vec::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords
            .extend(keywords.iter().map(|k| (*k).to_string()));
        self
    }

    pub fn with_pattern(mut self, pattern: impl SignalMatcher + 'static) -> Self {
        self.patterns.push(Box::new(pattern));
        self
    }

    /// Keyword hits count 1, pattern hits count 2.
    pub fn score(&self, text: &str) -> u32 {
        let keyword_hits = self
            .keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .count() as u32;
        let pattern_hits = self.patterns.iter().filter(|p| p.is_match(text)).count() as u32;
        keyword_hits + pattern_hits * 2
    }
}

/// Keyword signals for one action.
#[derive(Debug, Clone)]
pub struct ActionSignals {
    pub action: QueryAction,
    pub keywords: Vec<String>,
}

impl ActionSignals {
    pub fn new(action: QueryAction, keywords: &[&str]) -> Self {
        Self {
            action,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    pub fn score(&self, text: &str) -> u32 {
        self.keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .count() as u32
    }
}

/// Ordered domain and action signals. Order is the tie-break order.
pub struct SignalTable {
    pub domains: Vec<DomainSignals>,
    pub actions: Vec<ActionSignals>,
}

impl SignalTable {
    /// Shared instance of the built-in review-analytics table.
    pub fn standard() -> Arc<SignalTable> {
        STANDARD_TABLE.clone()
    }

    /// Build the built-in table. Prefer [`SignalTable::standard`], which
    /// compiles the patterns once.
    pub fn build_standard() -> Result<Self, regex::Error> {
        let domains = DOMAIN_SIGNALS
            .iter()
            .map(|(domain, keywords, patterns)| {
                patterns.iter().try_fold(
                    DomainSignals::new(*domain).with_keywords(keywords),
                    |signals, pattern| -> Result<DomainSignals, regex::Error> {
                        Ok(signals.with_pattern(RegexSignal::new(pattern)?))
                    },
                )
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let actions = ACTION_SIGNALS
            .iter()
            .map(|(action, keywords)| ActionSignals::new(*action, keywords))
            .collect();

        Ok(Self { domains, actions })
    }
}

static STANDARD_TABLE: LazyLock<Arc<SignalTable>> = LazyLock::new(|| {
    Arc::new(SignalTable::build_standard().expect("Invalid regex in standard signal table"))
});

// ============================================================================
// Classification Signals
// ============================================================================

type DomainRow = (QueryDomain, &'static [&'static str], &'static [&'static str]);

const DOMAIN_SIGNALS: [DomainRow; 9] = [
    (
        QueryDomain::Sentiment,
        &["sentiment", "rating", "stars", "happy", "satisfied", "mood", "feeling", "opinion"],
        &["how.*feel", "what.*think", "sentiment.*analysis"],
    ),
    (
        QueryDomain::Themes,
        &["theme", "topic", "mention", "say", "talk", "complaint", "praise", "feedback"],
        &["what.*saying", "what.*people.*talk", "themes.*about"],
    ),
    (
        QueryDomain::Communities,
        &[
            "community",
            "location",
            "neighborhood",
            "area",
            "downtown",
            "uptown",
            "westside",
            "midtown",
            "region",
            "h3",
            "hexagon",
        ],
        &["in.*", "at.*location", "by.*community"],
    ),
    (
        QueryDomain::Platforms,
        &["google", "yelp", "facebook", "synup", "platform", "channel", "source"],
        &["google.*vs", "compare.*platform", "on.*yelp"],
    ),
    (
        QueryDomain::Loyalty,
        &["loyalty", "points", "rewards", "redeem", "award", "balance", "yotpo"],
        &["loyalty.*", "points.*", "reward.*"],
    ),
    (
        QueryDomain::TimeSeries,
        &["trend", "over time", "week", "month", "day", "growing", "declining", "change"],
        &["trend.*", "over.*time", "last.*week"],
    ),
    (
        QueryDomain::Comparison,
        &["vs", "versus", "compare", "compared to", "difference", "better", "worse"],
        // ".*vs.*" appears twice on purpose; both hits count.
        &[".*vs.*", "compare.*", ".*vs.*"],
    ),
    (
        QueryDomain::Anomaly,
        &["anomaly", "unusual", "weird", "strange", "spike", "drop", "outlier", "wrong"],
        &["what.*wrong", "why.*drop", "unusual"],
    ),
    (
        QueryDomain::Forecast,
        &["forecast", "predict", "expect", "will", "next week", "trend", "projection"],
        &["will.*", "expect.*", "forecast.*"],
    ),
];

const ACTION_SIGNALS: [(QueryAction, &[&str]); 7] = [
    (
        QueryAction::Summarize,
        &["summary", "overview", "high level", "tell me", "what's", "how are"],
    ),
    (
        QueryAction::DrillDown,
        &["details", "breakdown", "dig", "deeper", "specifics", "exactly", "all"],
    ),
    (
        QueryAction::Compare,
        &["vs", "compare", "difference", "better", "worse", "same"],
    ),
    (
        QueryAction::Trend,
        &["trend", "over time", "growing", "declining", "change"],
    ),
    (
        QueryAction::Rank,
        &["top", "bottom", "best", "worst", "ranking", "list"],
    ),
    (
        QueryAction::Calculate,
        &["calculate", "math", "total", "average", "how many", "count"],
    ),
    (
        QueryAction::Predict,
        &["predict", "forecast", "will", "expect", "next"],
    ),
];

// ============================================================================
// Extraction Signals
// ============================================================================

/// Named areas, tested in order; first hit wins.
pub const LOCATIONS: [&str; 4] = ["downtown", "midtown", "uptown", "westside"];

/// Review channels, tested in order; first hit wins.
pub const PLATFORMS: [&str; 4] = ["google", "yelp", "facebook", "synup"];

/// Timeframe phrases. Every row is tested; the last matching row wins.
pub const TIMEFRAME_PATTERNS: [(Timeframe, &[&str]); 5] = [
    (Timeframe::LastWeek, &["last week", "this week", "weekly"]),
    (Timeframe::Last30Days, &["last 30", "month", "monthly"]),
    (Timeframe::Last90Days, &["last 90", "quarter", "quarterly"]),
    (Timeframe::YearToDate, &["year", "ytd", "since"]),
    (Timeframe::AllTime, &["all time", "ever"]),
];

pub const PARKING_TERMS: [&str; 1] = ["parking"];
pub const PARKING_KEYWORDS: [&str; 1] = ["parking"];

pub const STAFF_TERMS: [&str; 2] = ["staff", "service"];
pub const STAFF_KEYWORDS: [&str; 2] = ["staff", "service"];

// ============================================================================
// Confidence Signals
// ============================================================================

/// Terms that name a domain unambiguously.
pub const STRONG_DOMAIN_TERMS: [&str; 4] = ["sentiment", "theme", "community", "loyalty"];

/// Terms that name an action unambiguously.
pub const STRONG_ACTION_TERMS: [&str; 4] = ["compare", "trend", "summary", "details"];

// ============================================================================
// Tests
// ============================================================================
