//! CLI module for the Review Lens command-line interface.
//!
//! This module provides command handlers that wire configuration, the review
//! store and the query executor together, and print the results.

mod commands;
mod output;
pub mod types;

pub use commands::*;
