//! Configuration for Review Lens.

mod settings;

pub use settings::*;
