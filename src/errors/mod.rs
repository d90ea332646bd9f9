//! Error handling module for the roster client.
//!
//! Provides the crate error type, error codes, and lenient parsing of the
//! error bodies returned by the remote collection endpoint.

use serde::Deserialize;

use crate::models::MutationKind;
use crate::validation::ValidationErrors;

/// Message shown when the server did not provide one.
pub const GENERIC_MESSAGE: &str =
    "We encountered an unexpected issue while processing your request.";

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const STATUS_ERROR: &str = "STATUS_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const BUSY: &str = "BUSY";
    pub const REJECTED: &str = "REJECTED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
}

/// Client error type.
#[derive(Debug, Clone)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, body read)
    Transport(String),
    /// The endpoint answered with a non-success status
    Status {
        status: u16,
        message: Option<String>,
    },
    /// The response body could not be decoded
    Decode(String),
    /// Invalid configuration value
    Config(String),
    /// Field-scoped validation failed; never reaches the network
    Validation(ValidationErrors),
    /// Another mutation is still in flight
    Busy,
    /// The requested interaction is not allowed in the current state
    Rejected(String),
    /// A referenced record is not in the local snapshot
    NotFound(String),
}

impl ClientError {
    /// Get the HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => codes::TRANSPORT_ERROR,
            ClientError::Status { .. } => codes::STATUS_ERROR,
            ClientError::Decode(_) => codes::DECODE_ERROR,
            ClientError::Config(_) => codes::CONFIG_ERROR,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::Busy => codes::BUSY,
            ClientError::Rejected(_) => codes::REJECTED,
            ClientError::NotFound(_) => codes::NOT_FOUND,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Transport(msg) => msg.clone(),
            ClientError::Status { status, message } => match message {
                Some(msg) => format!("{} ({})", msg, status),
                None => format!("request failed with status {}", status),
            },
            ClientError::Decode(msg) => msg.clone(),
            ClientError::Config(msg) => msg.clone(),
            ClientError::Validation(errors) => errors.summary(),
            ClientError::Busy => "another change is still being saved".to_string(),
            ClientError::Rejected(msg) => msg.clone(),
            ClientError::NotFound(msg) => msg.clone(),
        }
    }

    /// Message suitable for the error dialog: the server-provided text when
    /// present, the generic message otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Status {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!("HTTP error: {:?}", err);
        if err.is_decode() {
            ClientError::Decode(format!("Response decode error: {}", err))
        } else {
            ClientError::Transport(format!("Transport error: {}", err))
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::warn!("JSON error: {:?}", err);
        ClientError::Decode(format!("JSON error: {}", err))
    }
}

/// Error details in an enveloped error body.
#[derive(Debug, Deserialize)]
pub struct ErrorDetails {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error bodies the endpoint may send: an envelope
/// `{ success: false, error: { code, message } }` or a flat `{ message }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Envelope { error: ErrorDetails },
    Flat { message: Option<String> },
}

/// Extract a server-provided message from an error response body.
pub fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed {
        ErrorBody::Envelope { error } => error.message,
        ErrorBody::Flat { message } => message,
    };
    message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// Which part of the client a surfaced failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    Fetch,
    Mutation(MutationKind),
}

/// A failure presented through the error dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub origin: ErrorOrigin,
    pub code: &'static str,
    pub message: String,
}

impl ErrorNotice {
    pub fn new(origin: ErrorOrigin, error: &ClientError) -> Self {
        Self {
            origin,
            code: error.error_code(),
            message: error.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_from_envelope() {
        let body = r#"{"success":false,"error":{"code":"CONFLICT","message":"Email already exists"},"revisionId":3}"#;
        assert_eq!(server_message(body).as_deref(), Some("Email already exists"));
    }

    #[test]
    fn test_server_message_from_flat_body() {
        let body = r#"{"timestamp":"2024-01-01T00:00:00","status":404,"error":"Not Found","message":"Team member not found"}"#;
        assert_eq!(server_message(body).as_deref(), Some("Team member not found"));
    }

    #[test]
    fn test_server_message_missing_or_blank() {
        assert_eq!(server_message(""), None);
        assert_eq!(server_message("<html>oops</html>"), None);
        assert_eq!(server_message(r#"{"message":"   "}"#), None);
        assert_eq!(server_message(r#"{"status":500}"#), None);
    }

    #[test]
    fn test_user_message_falls_back_to_generic() {
        let with_message = ClientError::Status {
            status: 409,
            message: Some("Email already exists".to_string()),
        };
        assert_eq!(with_message.user_message(), "Email already exists");

        let without = ClientError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(without.user_message(), GENERIC_MESSAGE);
        assert_eq!(
            ClientError::Transport("connection refused".into()).user_message(),
            GENERIC_MESSAGE
        );
    }

    #[test]
    fn test_error_codes_and_display() {
        let err = ClientError::Status {
            status: 404,
            message: Some("Team member not found".to_string()),
        };
        assert_eq!(err.error_code(), codes::STATUS_ERROR);
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(
            err.to_string(),
            "STATUS_ERROR: Team member not found (404)"
        );
        assert_eq!(ClientError::Busy.error_code(), codes::BUSY);
        assert_eq!(ClientError::Busy.status_code(), None);
    }

    #[test]
    fn test_error_notice_carries_origin() {
        let notice = ErrorNotice::new(
            ErrorOrigin::Mutation(MutationKind::Create),
            &ClientError::Status {
                status: 409,
                message: Some("Email already exists".into()),
            },
        );
        assert_eq!(notice.origin, ErrorOrigin::Mutation(MutationKind::Create));
        assert_eq!(notice.code, codes::STATUS_ERROR);
        assert_eq!(notice.message, "Email already exists");
    }
}
