//! Data models module
//!
//! This module contains the event and filter structures shared by the
//! search engine and the signup forms

pub mod event;
pub mod filter;

// Re-export commonly used models
pub use event::{Event, EventRow, EventContext, submission_hash, SUBMISSION_SEPARATOR};
pub use filter::{FilterCriteria, FilterState, DateRange};
