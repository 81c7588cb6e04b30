//! # Client Error Types
//!
//! Error types for remote calls and configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │   HTTP Status   │  │     Payload             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Connection     │  │  Status {404,   │  │  Decode                 │ │
//! │  │  Timeout        │  │   detail}       │  │  Validation (local)     │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Configuration  │  │    Composer     │                              │
//! │  │                 │  │                 │                              │
//! │  │  ConfigError    │  │  CoreError      │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use vendas_core::{CoreError, ValidationError};

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Client Error
// =============================================================================

/// Everything that can go wrong while talking to the sales backend.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The backend could not be reached.
    ///
    /// ## When This Occurs
    /// - Backend not running on the configured base URL
    /// - DNS failure, connection refused or reset
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // HTTP Errors
    // =========================================================================
    /// Non-success HTTP status. `detail` comes from the backend's
    /// `{"detail": ...}` body when present.
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// Response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Input rejected locally before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Composer refused a transition.
    #[error(transparent)]
    Composer(#[from] CoreError),

    // =========================================================================
    // Setup Errors
    // =========================================================================
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Returns true if repeating the same request may succeed.
    ///
    /// ## Retryable Errors
    /// - Connection failures and timeouts
    /// - 5xx responses
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Connection(_) | ClientError::Timeout(_) => true,
            ClientError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true for a 404 from the backend.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status {
                status: status.as_u16(),
                detail: err.to_string(),
            }
        } else {
            ClientError::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

// =============================================================================
// Config Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid setting value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Base URL is not an absolute http(s) URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

impl From<url::ParseError> for ConfigError {
    fn from(err: url::ParseError) -> Self {
        ConfigError::InvalidUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::Connection("refused".into()).is_retryable());
        assert!(ClientError::Timeout(10).is_retryable());
        assert!(ClientError::Status {
            status: 503,
            detail: "unavailable".into()
        }
        .is_retryable());

        assert!(!ClientError::Status {
            status: 400,
            detail: "bad".into()
        }
        .is_retryable());
        assert!(!ClientError::Decode("eof".into()).is_retryable());
        assert!(!ClientError::Validation(ValidationError::EmptyCart).is_retryable());
    }

    #[test]
    fn test_status_display_includes_detail() {
        let err = ClientError::Status {
            status: 404,
            detail: "Produto não encontrado".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Produto não encontrado");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_message_is_transparent() {
        let err: ClientError = ValidationError::SelectionRequired.into();
        assert_eq!(err.to_string(), "select product and valid quantity");
    }
}
