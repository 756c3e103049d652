//! Event search
//!
//! Fuzzy string matching and the filter engine built on it.

pub mod engine;
pub mod fuzzy;

pub use engine::{apply, filter_options, FilterEngine, FilterOptions};
