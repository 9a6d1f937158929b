//! Domain error types
//!
//! This module defines the error hierarchy for orderdesk.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main orderdesk error type
///
/// This is the primary error type used throughout the application.
/// No variant is fatal to the console: a failed fetch leaves the last
/// successfully fetched collection in place and the view stays usable.
#[derive(Debug, Error)]
pub enum DeskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Loading orders or courses failed (network or non-success response)
    #[error("Failed to fetch {resource}: {source}")]
    Fetch {
        /// Which collection was being loaded ("orders", "courses")
        resource: &'static str,
        /// Underlying remote failure
        #[source]
        source: RemoteError,
    },

    /// Updating or deleting a course was rejected or never arrived
    #[error("Failed to {action} course {course_id}: {source}")]
    CourseChange {
        /// "update" or "delete"
        action: &'static str,
        /// Course the change was aimed at
        course_id: String,
        /// Underlying remote failure
        #[source]
        source: RemoteError,
    },

    /// An export endpoint answered with the wrong content type
    #[error("Invalid response format: expected {expected}, got {actual}")]
    InvalidResponseFormat {
        /// Content type the endpoint must return
        expected: String,
        /// Content type the endpoint actually returned
        actual: String,
    },

    /// Rasterization, document composition or batch export failed
    #[error("Export error: {0}")]
    Export(String),

    /// The requested operation is not allowed for this order
    #[error("Operation not allowed: {0}")]
    Ineligible(String),

    /// Session credential storage errors
    #[error("Session storage error: {0}")]
    Session(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl DeskError {
    /// Wrap a remote failure that happened while loading `resource`
    pub fn fetch(resource: &'static str, source: RemoteError) -> Self {
        DeskError::Fetch { resource, source }
    }

    /// Wrap a remote failure of a course update or delete
    pub fn course_change(
        action: &'static str,
        course_id: impl Into<String>,
        source: RemoteError,
    ) -> Self {
        DeskError::CourseChange {
            action,
            course_id: course_id.into(),
            source,
        }
    }

    fn remote_source(&self) -> Option<&RemoteError> {
        match self {
            DeskError::Fetch { source, .. } | DeskError::CourseChange { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    /// True when the remote service rejected the bearer token
    ///
    /// An unusable session token is not detected locally; it shows up here,
    /// as an authorization failure on the next network call.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.remote_source(), Some(RemoteError::Unauthorized(_)))
    }

    /// True for transport-level failures (server unreachable, timeout)
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self.remote_source(),
            Some(RemoteError::ConnectionFailed(_) | RemoteError::Timeout(_))
        )
    }
}

/// Remote service errors
///
/// Errors that occur when talking to the order service.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Failed to connect to the service
    #[error("Failed to connect to order service: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 401/403 from the service
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Body could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The request could not be built (bad URL)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RemoteError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => RemoteError::Unauthorized(format!("{status} - {message}")),
            400..=499 => RemoteError::ClientError { status, message },
            _ => RemoteError::ServerError { status, message },
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for DeskError {
    fn from(err: std::io::Error) -> Self {
        DeskError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        DeskError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for DeskError {
    fn from(err: toml::de::Error) -> Self {
        DeskError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desk_error_display() {
        let err = DeskError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_fetch_error_display_names_resource() {
        let err = DeskError::fetch(
            "orders",
            RemoteError::ConnectionFailed("connection refused".to_string()),
        );
        assert!(err.to_string().starts_with("Failed to fetch orders"));
        assert!(err.is_connection_failure());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_remote_error_from_status() {
        assert!(matches!(
            RemoteError::from_status(401, "no token"),
            RemoteError::Unauthorized(_)
        ));
        assert!(matches!(
            RemoteError::from_status(403, "forbidden"),
            RemoteError::Unauthorized(_)
        ));
        assert!(matches!(
            RemoteError::from_status(404, "missing"),
            RemoteError::ClientError { status: 404, .. }
        ));
        assert!(matches!(
            RemoteError::from_status(502, "bad gateway"),
            RemoteError::ServerError { status: 502, .. }
        ));
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = DeskError::fetch("courses", RemoteError::from_status(401, "expired"));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_course_change_classification() {
        let err = DeskError::course_change("delete", "c1", RemoteError::from_status(404, "gone"));
        assert_eq!(
            err.to_string(),
            "Failed to delete course c1: Client error: 404 - gone"
        );
        assert!(!err.is_unauthorized());
        assert!(!err.is_connection_failure());

        let err = DeskError::course_change("update", "c1", RemoteError::from_status(403, "no"));
        assert!(err.is_unauthorized());
        let err = DeskError::course_change(
            "update",
            "c1",
            RemoteError::Timeout("30s".to_string()),
        );
        assert!(err.is_connection_failure());
    }

    #[test]
    fn test_invalid_response_format_display() {
        let err = DeskError::InvalidResponseFormat {
            expected: "application/pdf".to_string(),
            actual: "text/html".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid response format: expected application/pdf, got text/html"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: DeskError = io_err.into();
        assert!(matches!(err, DeskError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: DeskError = json_err.into();
        assert!(matches!(err, DeskError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: DeskError = toml_err.into();
        assert!(matches!(err, DeskError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_desk_error_implements_std_error() {
        let err = DeskError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
