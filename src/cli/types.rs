//! CLI response types for the parse and chat commands.
//!
//! These types are used by the CLI to format output for users.

use review_lens::{DerivedQuery, QueryDomain, QueryIntent};
use serde::{Deserialize, Serialize};

/// Result type for the parse command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub intent: QueryIntent,
    pub derived: DerivedQuery,
    /// Domains that scored above zero, highest first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domain_scores: Vec<DomainScore>,
}

/// One domain's classifier score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: QueryDomain,
    pub score: u32,
}

/// One turn of a chat session, as listed when the session ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub turn: usize,
    pub query: String,
    pub interpretation: String,
    pub confidence: f64,
}

impl HistoryEntry {
    pub fn from_intent(turn: usize, intent: &QueryIntent) -> Self {
        Self {
            turn,
            query: intent.original_query.clone(),
            interpretation: intent.detailed_name(),
            confidence: intent.confidence,
        }
    }
}
