//! Error types for the Strava API client.
//!
//! This module provides a comprehensive error type that covers all possible
//! failure modes when interacting with the Strava API, from transport
//! failures to server-side faults to local usage mistakes.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Strava operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error payload returned by the Strava API.
///
/// Strava error bodies carry a top-level message plus a list of
/// field-level error descriptors. Both are preserved verbatim because
/// they often contain actionable detail (e.g. which field was invalid).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fault {
    /// The primary server-provided error message.
    #[serde(default)]
    pub message: String,
    /// Field-level error descriptors, if any.
    #[serde(default)]
    pub errors: Vec<FaultField>,
}

/// A single field-level error descriptor within a [`Fault`].
#[derive(Debug, Clone, Deserialize)]
pub struct FaultField {
    /// The resource the error relates to (e.g. `"Activity"`).
    #[serde(default)]
    pub resource: String,
    /// The offending field (e.g. `"id"`).
    #[serde(default)]
    pub field: String,
    /// The error code (e.g. `"invalid"`).
    #[serde(default)]
    pub code: String,
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        for e in &self.errors {
            write!(f, "; {} {}: {}", e.resource, e.field, e.code)?;
        }
        Ok(())
    }
}

/// The main error type for all Strava API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed at the transport level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Credentials are invalid, expired, or revoked, or a token refresh
    /// attempt failed. Re-running the authorization flow is expected.
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the request with HTTP 429. Local rate-limit
    /// bookkeeping is a courtesy only; this error is authoritative.
    #[error("Rate limit exceeded: {fault}")]
    RateLimitExceeded {
        /// Server-provided fault detail.
        fault: Fault,
    },

    /// Any other non-2xx response
    #[error("API error: status={status}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Primary server-provided error message
        message: String,
        /// Structured fault detail, when present
        fault: Fault,
        /// Raw response body for debugging
        body: Value,
    },

    /// Entity decoding failed: a required field for the claimed detail
    /// tier was absent or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Local programmer error, e.g. invoking a lazy accessor on an
    /// unbound entity or mutating an iterator's cap mid-iteration.
    #[error("Usage error: {0}")]
    Usage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this is an authorization-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authorization(_))
    }

    /// Returns `true` if this error indicates a client-side issue.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 400 && *status < 500,
            Error::NotFound(_)
            | Error::Authorization(_)
            | Error::RateLimitExceeded { .. }
            | Error::Usage(_)
            | Error::Validation(_)
            | Error::Config(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Parse the fault payload out of a raw error body.
    pub(crate) fn fault_from_body(body: &Value) -> Fault {
        serde_json::from_value(body.clone()).unwrap_or_default()
    }

    /// Create an API error from a non-2xx response body.
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let fault = Self::fault_from_body(&body);
        let message = if fault.message.is_empty() {
            "Undefined error".to_string()
        } else {
            fault.message.clone()
        };

        Error::Api {
            status,
            message,
            fault,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_auth() {
        assert!(Error::Authorization("revoked".into()).is_auth_error());
        assert!(!Error::NotFound("activity".into()).is_auth_error());
    }

    #[test]
    fn test_from_api_response() {
        let body = serde_json::json!({
            "message": "Bad Request",
            "errors": [
                {"resource": "Activity", "field": "type", "code": "invalid"}
            ]
        });

        let err = Error::from_api_response(400, body);
        match err {
            Error::Api {
                status,
                message,
                fault,
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad Request");
                assert_eq!(fault.errors.len(), 1);
                assert_eq!(fault.errors[0].field, "type");
            }
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn test_from_api_response_unstructured_body() {
        let err = Error::from_api_response(502, serde_json::json!("gateway choked"));
        match err {
            Error::Api {
                status, message, ..
            } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Undefined error");
            }
            _ => panic!("Expected Api error"),
        }
        assert!(Error::from_api_response(502, Value::Null).is_server_error());
    }

    #[test]
    fn test_fault_display_includes_field_errors() {
        let fault = Fault {
            message: "Authorization Error".into(),
            errors: vec![FaultField {
                resource: "Application".into(),
                field: "".into(),
                code: "invalid".into(),
            }],
        };
        let text = fault.to_string();
        assert!(text.contains("Authorization Error"));
        assert!(text.contains("invalid"));
    }
}
