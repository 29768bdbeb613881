//! Review Lens: natural-language questions over customer review data
//!
//! Interprets free-text questions ("What's our sentiment in Westside?") into
//! a structured intent (domain, action, filters, confidence, reasoning), runs
//! them against a review data source, and shapes the answer for an
//! executive, analyst, manager or casual reader.

pub mod config;
pub mod error;
pub mod metrics;
pub mod query;
pub mod response;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{ConfigError, DataSourceError, Result, ReviewLensError};
pub use metrics::{get_metrics, Metrics, MetricsSnapshot};
pub use query::{
    ConfidenceFloor, ConversationContext, DerivedQuery, ExecutedQuery, IntentClassifier,
    QueryAction, QueryDomain, QueryExecutor, QueryFilters, QueryIntent, QueryInterpreter,
    QueryOutcome, QueryStats, ReviewDataSource, SignalTable, Timeframe,
};
pub use response::{FormattedResponse, Persona, ResponseFormatter};
pub use store::{ReviewRecord, ReviewStore};
