//! Persona-aware response formatting.
//!
//! Projects (intent, data, insights) onto the shape a persona expects. Every
//! shape is a pure read of its inputs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::metrics::get_metrics;
use crate::query::QueryIntent;
use crate::utils::humanize;

use super::persona::Persona;

pub const NO_DATA_HEADLINE: &str = "No data found";
pub const NO_ISSUES_SITUATION: &str = "No issues detected";
pub const CASUAL_PLACEHOLDER: &str = "Let me look into that...";
pub const CASUAL_NEXT_QUESTION: &str = "Want to know more about anything?";
pub const EXECUTIVE_FOLLOW_UPS: [&str; 3] = [
    "Want specific numbers?",
    "See the breakdown?",
    "How does this compare?",
];

// ============================================================================
// Response Shapes
// ============================================================================

/// Headline with optional drill-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveBrief {
    pub headline: String,
    pub key_metric: Value,
    pub trend: Value,
    pub drill_down_available: bool,
    pub follow_ups: Vec<String>,
}

/// Numbers, method and supporting detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystReport {
    pub summary: String,
    pub detailed_data: Value,
    pub methodology: String,
    pub confidence: f64,
    pub reasoning: String,
    pub supporting_insights: Vec<String>,
}

/// Situation, causes, actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerBrief {
    pub situation: String,
    pub root_causes: Vec<String>,
    pub recommended_actions: Value,
    pub success_metrics: Value,
}

/// Plain-language reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasualReply {
    pub message: String,
    pub highlights: Vec<String>,
    pub next_question: String,
    pub simple_summary: String,
}

/// A response shaped for one persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "persona", rename_all = "snake_case")]
pub enum FormattedResponse {
    Executive(ExecutiveBrief),
    Analyst(AnalystReport),
    Manager(ManagerBrief),
    Casual(CasualReply),
}

impl FormattedResponse {
    pub fn persona(&self) -> Persona {
        match self {
            Self::Executive(_) => Persona::Executive,
            Self::Analyst(_) => Persona::Analyst,
            Self::Manager(_) => Persona::Manager,
            Self::Casual(_) => Persona::Casual,
        }
    }

    /// The response as a JSON mapping, including the `persona` tag.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// Shapes query results for presentation.
pub struct ResponseFormatter;

impl ResponseFormatter {
    /// Format for a persona given as free text; unknown tags get the casual shape.
    pub fn format_for_user(
        intent: &QueryIntent,
        data: &Map<String, Value>,
        insights: &[String],
        persona: &str,
    ) -> FormattedResponse {
        Self::format(intent, data, insights, Persona::parse(persona))
    }

    /// Format for a known persona.
    pub fn format(
        intent: &QueryIntent,
        data: &Map<String, Value>,
        insights: &[String],
        persona: Persona,
    ) -> FormattedResponse {
        get_metrics().record_response(persona);
        match persona {
            Persona::Executive => FormattedResponse::Executive(Self::executive(data, insights)),
            Persona::Analyst => FormattedResponse::Analyst(Self::analyst(intent, data, insights)),
            Persona::Manager => FormattedResponse::Manager(Self::manager(data, insights)),
            Persona::Casual => FormattedResponse::Casual(Self::casual(data, insights)),
        }
    }

    fn executive(data: &Map<String, Value>, insights: &[String]) -> ExecutiveBrief {
        ExecutiveBrief {
            headline: first_or(insights, NO_DATA_HEADLINE),
            key_metric: field(data, "primary_value"),
            trend: field(data, "trend_direction"),
            drill_down_available: insights.len() > 1,
            follow_ups: EXECUTIVE_FOLLOW_UPS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    fn analyst(
        intent: &QueryIntent,
        data: &Map<String, Value>,
        insights: &[String],
    ) -> AnalystReport {
        AnalystReport {
            summary: first_or(insights, NO_DATA_HEADLINE),
            detailed_data: field(data, "full_dataset"),
            methodology: format!("Analyzed {} records", record_count(data)),
            confidence: intent.confidence,
            reasoning: intent.reasoning.clone(),
            supporting_insights: insights.iter().skip(1).cloned().collect(),
        }
    }

    fn manager(data: &Map<String, Value>, insights: &[String]) -> ManagerBrief {
        ManagerBrief {
            situation: first_or(insights, NO_ISSUES_SITUATION),
            root_causes: insights.iter().skip(1).take(2).cloned().collect(),
            recommended_actions: data
                .get("recommendations")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            success_metrics: field(data, "success_metrics"),
        }
    }

    fn casual(data: &Map<String, Value>, insights: &[String]) -> CasualReply {
        CasualReply {
            message: insights
                .first()
                .map(|i| humanize(i))
                .unwrap_or_else(|| CASUAL_PLACEHOLDER.to_string()),
            highlights: insights.iter().skip(1).take(2).map(|i| humanize(i)).collect(),
            next_question: CASUAL_NEXT_QUESTION.to_string(),
            simple_summary: format!("Analyzed {} data points", record_count(data)),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn first_or(insights: &[String], fallback: &str) -> String {
    insights
        .first()
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

fn field(data: &Map<String, Value>, key: &str) -> Value {
    data.get(key).cloned().unwrap_or(Value::Null)
}

/// `record_count` rendered for a sentence; 0 when absent or null.
fn record_count(data: &Map<String, Value>) -> String {
    match data.get("record_count") {
        None | Some(Value::Null) => "0".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
