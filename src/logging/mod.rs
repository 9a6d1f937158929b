//! Logging and observability
//!
//! Structured logging with `tracing`:
//! - human-readable console output on stderr
//! - optional JSON lines to a rolling local file
//! - helper macros for the fetch and export lifecycle
//!
//! # Example
//!
//! ```no_run
//! use orderdesk::logging::init_logging;
//! use orderdesk::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Console started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the completion of a collection fetch
///
/// # Example
///
/// ```no_run
/// use orderdesk::log_fetch_complete;
/// use std::time::Duration;
///
/// log_fetch_complete!("orders", 42, 7, Duration::from_millis(180));
/// ```
#[macro_export]
macro_rules! log_fetch_complete {
    ($resource:expr, $count:expr, $sequence:expr, $duration:expr) => {
        tracing::info!(
            resource = $resource,
            count = $count,
            sequence = $sequence,
            duration_ms = $duration.as_millis() as u64,
            "Fetch completed"
        );
    };
}

/// Log a finished export artifact
///
/// # Example
///
/// ```no_run
/// use orderdesk::log_export_complete;
///
/// log_export_complete!("snapshot", "exports/orders.pdf", 18_432);
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($kind:expr, $path:expr, $bytes:expr) => {
        tracing::info!(
            kind = $kind,
            path = %$path,
            bytes = $bytes,
            "Export written"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use orderdesk::log_error_with_context;
/// use orderdesk::domain::DeskError;
///
/// let error = DeskError::Export("region is empty".to_string());
/// log_error_with_context!(&error, "Snapshot export failed");
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
