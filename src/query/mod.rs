//! Natural language query interpretation for Review Lens.
//!
//! This module provides:
//! - Domain and action classification over keyword/pattern signal tables
//! - Filter extraction (location, platform, timeframe, topic keywords)
//! - Confidence scoring and human-readable reasoning
//! - A bounded, caller-owned conversation context
//! - Query execution against a pluggable review data source

pub mod classifier;
pub mod confidence;
pub mod context;
pub mod executor;
pub mod extractor;
pub mod interpreter;
pub mod reasoning;
pub mod signals;
pub mod types;

pub use classifier::*;
pub use confidence::*;
pub use context::*;
pub use executor::*;
pub use extractor::*;
pub use interpreter::*;
pub use reasoning::*;
pub use signals::{ActionSignals, DomainSignals, RegexSignal, SignalMatcher, SignalTable, SubstringSignal};
pub use types::*;
