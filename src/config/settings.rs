//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub sheet: SheetConfig,
    pub forms: FormsConfig,
    pub storage: StorageConfig,
    pub filter: FilterConfig,
    pub logging: LoggingConfig,
}

/// Spreadsheet-backed event source
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetConfig {
    /// Root of the sheet-to-JSON service, rows live at `{base_url}/{spreadsheet_id}/{sheet_name}`
    pub base_url: String,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub timeout_seconds: u64,
}

/// External form backend
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormsConfig {
    /// Submissions go to `{base_url}/{form_id}/formResponse`
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Address shown in the generic failure alert
    pub support_email: String,
}

/// Where the submission-hash list is kept
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

/// Submission ledger storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// JSON file used by the `file` backend
    pub path: String,
    /// Connection string used by the `redis` backend
    pub redis_url: String,
    /// Key holding the JSON-encoded hash list
    pub key: String,
}

/// Fuzzy matching thresholds, 0 = identical, lower is stricter
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct FilterConfig {
    pub location_dedupe_threshold: f64,
    pub tag_dedupe_threshold: f64,
    pub match_threshold: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the rolling log file, stdout only when unset
    pub file_path: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("VOLUNTEER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::VolunteerError> {
        super::validation::validate_settings(self)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            location_dedupe_threshold: 0.15,
            tag_dedupe_threshold: 0.2,
            match_threshold: 0.3,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sheet: SheetConfig {
                base_url: "https://opensheet.elk.sh".to_string(),
                spreadsheet_id: String::new(),
                sheet_name: "Events".to_string(),
                timeout_seconds: 15,
            },
            forms: FormsConfig {
                base_url: "https://docs.google.com/forms/d/e".to_string(),
                timeout_seconds: 30,
                support_email: "volunteers@example.org".to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::File,
                path: "submissions.json".to_string(),
                redis_url: "redis://localhost:6379".to_string(),
                key: "submittedForms".to_string(),
            },
            filter: FilterConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
        }
    }
}
