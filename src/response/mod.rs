//! Response formatting for Review Lens.
//!
//! This module provides:
//! - Persona tags and their parsing rules
//! - Persona-specific projections of query results

pub mod formatter;
pub mod persona;

pub use formatter::*;
pub use persona::*;
