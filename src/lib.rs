//! Volunteer signup core
//!
//! Event discovery and signup for a volunteer program: fuzzy filtering over a
//! spreadsheet-backed event list, declarative signup forms with conditional
//! validation, and submission to a hosted form backend with an advisory
//! record of what was already sent.

pub mod config;
pub mod forms;
pub mod models;
pub mod search;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{VolunteerError, Result};

// Re-export main components for easy access
pub use forms::{FormController, FormEvent, FormPhase, FormVariant, SubmitOutcome};
pub use models::{Event, FilterCriteria, FilterState};
pub use search::FilterEngine;
pub use services::{FormServices, SheetClient, SubmissionLedger};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
