//! Types for the natural language query system.

use serde::{Deserialize, Serialize};

use crate::utils::humanize;

// ============================================================================
// Query Domain
// ============================================================================

/// Semantic domain a review question belongs to.
///
/// Declaration order matters: the classifier walks domains in this order and
/// the earliest domain wins a tie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDomain {
    /// Mood/rating analysis
    #[default]
    Sentiment,
    /// Topic/keyword extraction
    Themes,
    /// Geospatial (neighborhood) analysis
    Communities,
    /// Channel comparison
    Platforms,
    /// Points/rewards metrics
    Loyalty,
    /// Trend analysis
    TimeSeries,
    /// A vs B analysis
    Comparison,
    /// Outlier detection
    Anomaly,
    /// Predictive
    Forecast,
}

impl QueryDomain {
    /// All domains in classification order.
    pub const ALL: [QueryDomain; 9] = [
        Self::Sentiment,
        Self::Themes,
        Self::Communities,
        Self::Platforms,
        Self::Loyalty,
        Self::TimeSeries,
        Self::Comparison,
        Self::Anomaly,
        Self::Forecast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::Themes => "themes",
            Self::Communities => "communities",
            Self::Platforms => "platforms",
            Self::Loyalty => "loyalty",
            Self::TimeSeries => "time_series",
            Self::Comparison => "comparison",
            Self::Anomaly => "anomaly",
            Self::Forecast => "forecast",
        }
    }

    /// Human-readable name, e.g. "Time Series".
    pub fn display_name(&self) -> String {
        humanize(self.as_str())
    }
}

// ============================================================================
// Query Action
// ============================================================================

/// What the user wants to do with the data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryAction {
    /// High-level overview
    #[default]
    Summarize,
    /// Detailed breakdown
    DrillDown,
    /// Side-by-side
    Compare,
    /// Over time
    Trend,
    /// Top/bottom
    Rank,
    /// Math operations
    Calculate,
    /// Future extrapolation
    Predict,
}

impl QueryAction {
    /// All actions in classification order.
    pub const ALL: [QueryAction; 7] = [
        Self::Summarize,
        Self::DrillDown,
        Self::Compare,
        Self::Trend,
        Self::Rank,
        Self::Calculate,
        Self::Predict,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::DrillDown => "drill_down",
            Self::Compare => "compare",
            Self::Trend => "trend",
            Self::Rank => "rank",
            Self::Calculate => "calculate",
            Self::Predict => "predict",
        }
    }

    /// Human-readable name, e.g. "Drill Down".
    pub fn display_name(&self) -> String {
        humanize(self.as_str())
    }
}

// ============================================================================
// Timeframe
// ============================================================================

/// Time window a question refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "last_week")]
    LastWeek,
    #[default]
    #[serde(rename = "last_30d")]
    Last30Days,
    #[serde(rename = "last_90d")]
    Last90Days,
    #[serde(rename = "year_to_date")]
    YearToDate,
    #[serde(rename = "all_time")]
    AllTime,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastWeek => "last_week",
            Self::Last30Days => "last_30d",
            Self::Last90Days => "last_90d",
            Self::YearToDate => "year_to_date",
            Self::AllTime => "all_time",
        }
    }

    /// Tag with underscores turned into spaces, e.g. "last 30d".
    pub fn readable(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Whether this is the value assigned when nothing in the text matched.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Fixed look-back window in days, for the windows that have one.
    pub fn days(&self) -> Option<i64> {
        match self {
            Self::LastWeek => Some(7),
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::YearToDate | Self::AllTime => None,
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Structured constraints extracted from a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryFilters {
    /// Named area, title-cased ("Downtown", "Westside")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Review channel, title-cased ("Google", "Yelp")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Time window, always assigned
    #[serde(default)]
    pub timeframe: Timeframe,
    /// Topic tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Inclusive (min, max) rating range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_range: Option<(f32, f32)>,
    /// Minimum mention frequency. Never set by the extractor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_mention_count: Option<u32>,
}

impl QueryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_sentiment_range(mut self, min: f32, max: f32) -> Self {
        self.sentiment_range = Some((min, max));
        self
    }
}

// ============================================================================
// Query Intent
// ============================================================================

/// Structured interpretation of a natural language question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
    pub domain: QueryDomain,
    pub action: QueryAction,
    pub filters: QueryFilters,
    /// Interpretation quality, at most 0.95
    pub confidence: f64,
    /// The input exactly as the caller gave it
    pub original_query: String,
    /// Prior raw queries the caller supplied for this turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_context: Option<Vec<String>>,
    /// Pipe-delimited explanation of the interpretation
    pub reasoning: String,
}

impl QueryIntent {
    /// Short label such as "Sentiment / Summarize".
    pub fn detailed_name(&self) -> String {
        format!(
            "{} / {}",
            self.domain.display_name(),
            self.action.display_name()
        )
    }
}

// ============================================================================
// Derived Query
// ============================================================================

/// Executable description of an intent, handed to a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedQuery {
    pub domain: QueryDomain,
    pub action: QueryAction,
    pub filters: QueryFilters,
    /// One-line description, e.g. "summarize sentiment in Westside over last 30d"
    pub description: String,
}

impl DerivedQuery {
    pub fn from_intent(intent: &QueryIntent) -> Self {
        let mut description = format!(
            "{} {}",
            intent.action.as_str().replace('_', " "),
            intent.domain.as_str().replace('_', " ")
        );
        if let Some(ref location) = intent.filters.location {
            description.push_str(&format!(" in {}", location));
        }
        if let Some(ref platform) = intent.filters.platform {
            description.push_str(&format!(" on {}", platform));
        }
        if let Some(ref keywords) = intent.filters.keywords {
            description.push_str(&format!(" about {}", keywords.join("/")));
        }
        description.push_str(&format!(" over {}", intent.filters.timeframe.readable()));

        Self {
            domain: intent.domain,
            action: intent.action,
            filters: intent.filters.clone(),
            description,
        }
    }
}

// ============================================================================
// Query Outcome
// ============================================================================

/// What a data source returns: a result mapping plus ordered insights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub data: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub insights: Vec<String>,
}

impl QueryOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    pub fn with_insight(mut self, insight: impl Into<String>) -> Self {
        self.insights.push(insight.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
