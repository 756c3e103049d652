//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{VolunteerError, Result};
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_sheet_config(&settings.sheet)?;
    validate_forms_config(&settings.forms)?;
    validate_storage_config(&settings.storage)?;
    validate_filter_config(&settings.filter)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate sheet source configuration
fn validate_sheet_config(config: &super::SheetConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(VolunteerError::Config(
            "Sheet base URL is required".to_string()
        ));
    }

    url::Url::parse(&config.base_url)
        .map_err(|e| VolunteerError::Config(format!("Invalid sheet base URL: {}", e)))?;

    if config.spreadsheet_id.is_empty() {
        return Err(VolunteerError::Config(
            "Spreadsheet ID is required".to_string()
        ));
    }

    if config.sheet_name.is_empty() {
        return Err(VolunteerError::Config(
            "Sheet name is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(VolunteerError::Config(
            "Sheet timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate form backend configuration
fn validate_forms_config(config: &super::FormsConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(VolunteerError::Config(
            "Form base URL is required".to_string()
        ));
    }

    url::Url::parse(&config.base_url)
        .map_err(|e| VolunteerError::Config(format!("Invalid form base URL: {}", e)))?;

    if config.timeout_seconds == 0 {
        return Err(VolunteerError::Config(
            "Form submission timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate submission ledger storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.key.is_empty() {
        return Err(VolunteerError::Config(
            "Storage key is required".to_string()
        ));
    }

    match config.backend {
        StorageBackend::File if config.path.is_empty() => Err(VolunteerError::Config(
            "Storage path is required for the file backend".to_string()
        )),
        StorageBackend::Redis if config.redis_url.is_empty() => Err(VolunteerError::Config(
            "Redis URL is required for the redis backend".to_string()
        )),
        _ => Ok(()),
    }
}

/// Validate fuzzy matching thresholds
fn validate_filter_config(config: &super::FilterConfig) -> Result<()> {
    let thresholds = [
        ("location_dedupe_threshold", config.location_dedupe_threshold),
        ("tag_dedupe_threshold", config.tag_dedupe_threshold),
        ("match_threshold", config.match_threshold),
    ];

    for (name, value) in thresholds {
        if !(0.0..=1.0).contains(&value) {
            return Err(VolunteerError::Config(
                format!("{} must be within [0, 1], got {}", name, value)
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(VolunteerError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(VolunteerError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
