//! Error types for the Bankbot client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generic message shown when a failure carries nothing more specific.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// A shared error type for the entire Bankbot client.
///
/// Variants follow the three failure families of the client: input that
/// was rejected before any request went out, authentication/authorization
/// failures reported by the service, and transport/server failures.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BankbotError {
    /// Input rejected locally; no request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The service answered with `success: false`, or a non-success status
    /// whose body carried a message.
    #[error("{message}")]
    Rejected { message: String },

    /// A protected endpoint answered 401/403.
    #[error("Session expired or not authorized (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Non-success HTTP status without a server message
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection refused, timeout, DNS failure and the like
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected schema
    #[error("Malformed response: {0}")]
    Decode(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The operation is not offered by this resource
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BankbotError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Rejected error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if the service reported an expired or missing session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Check if the input was rejected before a request was sent
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the service answered `success: false`
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Check if this is a transport/server failure.
    ///
    /// Returns true for `Transport`, `Http` and `Decode` errors.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Http { .. } | Self::Decode(_)
        )
    }

    /// Text suitable for a user-facing notice.
    ///
    /// Server-provided messages are shown verbatim. Transport failures
    /// collapse to `fallback` so internals never reach the user.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { message } if !message.trim().is_empty() => message.clone(),
            Self::Validation(message) => message.clone(),
            Self::Unauthorized { .. } => "Your session has expired. Please log in again.".into(),
            _ => fallback.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for BankbotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for BankbotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BankbotError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for BankbotError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, BankbotError>`.
pub type Result<T> = std::result::Result<T, BankbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = BankbotError::rejected("Invalid credentials.");
        assert_eq!(err.user_message("Login failed."), "Invalid credentials.");
    }

    #[test]
    fn test_user_message_blank_rejection_uses_fallback() {
        let err = BankbotError::rejected("  ");
        assert_eq!(err.user_message("Login failed."), "Login failed.");
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let err = BankbotError::transport("tcp connect error: 127.0.0.1:5000");
        assert_eq!(err.user_message("Error logging in."), "Error logging in.");
        assert!(err.is_transport());
    }

    #[test]
    fn test_classification() {
        assert!(BankbotError::Unauthorized { status: 403 }.is_unauthorized());
        assert!(BankbotError::validation("empty").is_validation());
        assert!(
            BankbotError::Http {
                status: 500,
                message: "boom".into()
            }
            .is_transport()
        );
        assert!(!BankbotError::rejected("no").is_transport());
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BankbotError = io.into();
        match err {
            BankbotError::Io { message } => assert!(message.contains("NotFound")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
