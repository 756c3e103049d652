//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the signup core.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{Result, VolunteerError};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file appender on drop, so the caller has to
/// hold on to it for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| VolunteerError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let (file_layer, guard) = match config.file_path.as_deref() {
        Some(dir) if !dir.is_empty() => {
            let file_appender = tracing_appender::rolling::daily(dir, "volunteer-signup.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .map_err(|e| VolunteerError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log the outcome of a form submission
pub fn log_submission(title: &str, outcome: &str, details: Option<&str>) {
    info!(
        form = title,
        outcome = outcome,
        details = details,
        "Form submission finished"
    );
}

/// Log a configuration problem hit while submitting a form
pub fn log_config_error(title: &str, field: Option<&str>, error: &str) {
    error!(
        form = title,
        field = field,
        error = error,
        "Form configuration error"
    );
}

/// Log a failed read or write of the submission ledger
pub fn log_persistence_error(operation: &str, error: &str) {
    warn!(
        operation = operation,
        error = error,
        "Submission ledger operation failed"
    );
}

/// Log a filter recomputation
pub fn log_filter_applied(total: usize, visible: usize, cached: bool) {
    debug!(
        total = total,
        visible = visible,
        cached = cached,
        "Filter applied"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}
