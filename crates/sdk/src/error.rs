//! SDK error types
//!
//! This module defines the error types used throughout the SDK, including the
//! structured [`ServiceError`] raised when the API answers with an error payload.

use crate::models::ErrorPayload;
use std::fmt;
use thiserror::Error;

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// The API answered with an error payload
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Network error (DNS, connection, socket)
    #[error("Network error: {message}")]
    NetworkError {
        /// Error message
        message: String,
        /// Underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// API returned a body that is not JSON or does not match the expected shape
    #[error("Invalid API response ({status_code}): {message}")]
    InvalidResponse {
        /// HTTP status code of the response
        status_code: u16,
        /// Error message
        message: String,
        /// Underlying parse error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Request body could not be serialized
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Error message
        message: String,
        /// Underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request could not be built (bad URL, header name or value)
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error message
        message: String,
    },
}

impl SdkError {
    /// Get the status code if available
    ///
    /// For service errors this is the status carried in the payload, which may
    /// differ from the HTTP status of the response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::Service(err) => Some(err.status()),
            SdkError::InvalidResponse { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// The service error, if the API reported one
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            SdkError::Service(err) => Some(err),
            _ => None,
        }
    }

    /// Whether this is a service error carrying the given status
    pub fn is_service_status(&self, status: u16) -> bool {
        self.service_error().map_or(false, |err| err.status() == status)
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        SdkError::ConfigError {
            message: message.into(),
        }
    }
}

/// Error reported by the API as a structured payload
///
/// The original payload stays available so callers can inspect the status,
/// the raw message, and any validation errors attached to a run submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceError {
    payload: ErrorPayload,
}

impl ServiceError {
    /// Wrap an error payload
    pub fn new(payload: ErrorPayload) -> Self {
        Self { payload }
    }

    /// Status reported in the payload
    pub fn status(&self) -> u16 {
        self.payload.status
    }

    /// Message reported in the payload
    pub fn message(&self) -> &str {
        &self.payload.message
    }

    /// Validation errors, present for rejected run submissions
    pub fn errors(&self) -> Option<&[String]> {
        self.payload.errors.as_deref()
    }

    /// The full payload
    pub fn payload(&self) -> &ErrorPayload {
        &self.payload
    }

    /// Consume the error and return its payload
    pub fn into_payload(self) -> ErrorPayload {
        self.payload
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.payload.status, self.payload.message)?;

        if let Some(errors) = &self.payload.errors {
            let quoted: Vec<String> = errors.iter().map(|e| format!("'{}'", e)).collect();
            write!(f, " {}", quoted.join(", "))?;
        }

        Ok(())
    }
}

impl std::error::Error for ServiceError {}

impl From<ErrorPayload> for SdkError {
    fn from(payload: ErrorPayload) -> Self {
        SdkError::Service(ServiceError::new(payload))
    }
}

/// Convert from reqwest errors
impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_connect() {
            "Connection failed".to_string()
        } else if err.is_timeout() {
            "Request timed out".to_string()
        } else {
            err.to_string()
        };

        SdkError::NetworkError {
            message,
            source: Some(Box::new(err)),
        }
    }
}

/// Convert from JSON errors
impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::SerializationError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RelLink;

    fn payload(status: u16, message: &str, errors: Option<Vec<&str>>) -> ErrorPayload {
        ErrorPayload {
            status,
            message: message.to_string(),
            links: vec![
                RelLink::new("support", "https://hornet.speedrun.com/"),
                RelLink::new("report-issues", "https://github.com/speedruncom/api/issues"),
            ],
            errors: errors.map(|e| e.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn test_service_error_message() {
        let err = ServiceError::new(payload(404, "Not found", None));
        assert_eq!(err.to_string(), "[404] Not found");
    }

    #[test]
    fn test_service_error_message_with_errors() {
        let err = ServiceError::new(payload(
            400,
            "Invalid run",
            Some(vec!["category is required", "times are missing"]),
        ));
        assert_eq!(
            err.to_string(),
            "[400] Invalid run 'category is required', 'times are missing'"
        );
        assert_eq!(err.errors().map(|e| e.len()), Some(2));
    }

    #[test]
    fn test_error_status_code() {
        let err: SdkError = payload(500, "Internal error", None).into();
        assert_eq!(err.status_code(), Some(500));
        assert!(err.is_service_status(500));
        assert!(!err.is_service_status(404));

        let err = SdkError::config("bad");
        assert_eq!(err.status_code(), None);
        assert!(err.service_error().is_none());
    }

    #[test]
    fn test_service_error_keeps_payload() {
        let original = payload(403, "Forbidden", None);
        let err = ServiceError::new(original.clone());
        assert_eq!(err.payload(), &original);
        assert_eq!(err.into_payload(), original);
    }
}
