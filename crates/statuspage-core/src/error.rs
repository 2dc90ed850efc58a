//! Error types for Statuspage operations.
//!
//! This module provides the single error type shared by every Statuspage crate,
//! covering transport failures, unexpected HTTP statuses, response parsing and
//! caller-input validation.

use thiserror::Error;

/// Main error type for Statuspage operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The API answered with a non-success status on an operation that raises.
    #[error("{context}: HTTP {status}: {body}")]
    UnexpectedStatus {
        /// What the client was doing when the status was received
        context: String,
        /// HTTP status code returned by the API
        status: u16,
        /// Raw response body, kept for diagnosing validation failures
        body: String,
    },

    /// A success response could not be parsed into the expected shape
    #[error("Failed to parse Statuspage response: {0}")]
    ParseError(String),

    /// Caller supplied input that cannot be sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The API could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    HttpError(String),
}

/// Specialized result type for Statuspage operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an [`Error::UnexpectedStatus`].
    #[must_use]
    pub fn unexpected_status(context: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            context: context.into(),
            status,
            body: body.into(),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::HttpError(_) => "HTTP_ERROR",
        }
    }

    /// HTTP status code carried by the error, if the API answered at all.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        match self {
            Self::UnexpectedStatus { status, .. } => *status >= 500,
            Self::ParseError(_) | Self::ConfigError(_) => true,
            _ => false,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::unexpected_status("create", 422, "{}").error_code(),
            "UNEXPECTED_STATUS"
        );
        assert_eq!(
            Error::ParseError("test".to_string()).error_code(),
            "PARSE_ERROR"
        );
        assert_eq!(
            Error::InvalidRequest("test".to_string()).error_code(),
            "INVALID_REQUEST"
        );
        assert_eq!(
            Error::ValidationError("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::ServiceUnavailable("test".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            Error::HttpError("test".to_string()).error_code(),
            "HTTP_ERROR"
        );
    }

    #[test]
    fn test_unexpected_status_display_keeps_status_and_body() {
        let err = Error::unexpected_status(
            "Failed to create incident",
            422,
            r#"{"error":"Name can't be blank"}"#,
        );
        assert_eq!(
            err.to_string(),
            r#"Failed to create incident: HTTP 422: {"error":"Name can't be blank"}"#
        );
        assert_eq!(err.status_code(), Some(422));
    }

    #[test]
    fn test_status_code_absent_for_transport_errors() {
        assert_eq!(Error::Timeout("slow".to_string()).status_code(), None);
        assert_eq!(Error::ParseError("bad".to_string()).status_code(), None);
    }

    #[test]
    fn test_should_log() {
        assert!(Error::unexpected_status("list", 503, "").should_log());
        assert!(Error::ParseError("test".to_string()).should_log());
        assert!(Error::ConfigError("test".to_string()).should_log());

        assert!(!Error::unexpected_status("list", 404, "").should_log());
        assert!(!Error::InvalidRequest("test".to_string()).should_log());
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::Validate;

        #[derive(Validate)]
        struct Paging {
            #[validate(range(min = 1))]
            page: u32,
        }

        let err: Error = Paging { page: 0 }.validate().unwrap_err().into();
        assert!(matches!(err, Error::ValidationError(ref msg) if msg.contains("page")));
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_error_partial_eq() {
        let err1 = Error::InvalidRequest("test".to_string());
        let err2 = Error::InvalidRequest("test".to_string());
        let err3 = Error::InvalidRequest("other".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
