//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with a configurable level
//! - JSON-formatted log files with daily or hourly rotation
//! - Export pipeline event macros
//!
//! # Example
//!
//! ```no_run
//! use groupsplit::logging::init_logging;
//! use groupsplit::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of one group's export
///
/// # Example
///
/// ```no_run
/// use groupsplit::log_group_start;
///
/// log_group_start!(0, 2, "Logo");
/// ```
#[macro_export]
macro_rules! log_group_start {
    ($index:expr, $total:expr, $group:expr) => {
        tracing::info!(
            group_index = $index,
            group_count = $total,
            group = %$group,
            "Exporting group"
        );
    };
}

/// Log a failed step of one group's export
///
/// # Example
///
/// ```no_run
/// use groupsplit::log_group_failure;
///
/// log_group_failure!("Logo", "save", "disk full");
/// ```
#[macro_export]
macro_rules! log_group_failure {
    ($group:expr, $stage:expr, $error:expr) => {
        tracing::warn!(
            group = %$group,
            stage = $stage,
            error = %$error,
            "Group export failed"
        );
    };
}

/// Log the completion of an export run
///
/// # Example
///
/// ```no_run
/// use groupsplit::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!(3, Duration::from_millis(250));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis(),
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use groupsplit::log_error_with_context;
/// use groupsplit::domain::GroupSplitError;
///
/// let error = GroupSplitError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    #[test]
    fn test_macros_expand_without_subscriber() {
        log_group_start!(1, 3, "Logo");
        log_group_failure!("Logo", "trim", "nothing to trim");
        log_export_complete!(3, Duration::from_millis(5));
        log_error_with_context!("boom", "testing");
    }
}
