//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for gcontacts
///
/// The authentication and directory variants mirror the failure classes the
/// sync layer reasons about:
/// - `AuthConfig` is fatal until the user fixes configuration
/// - `AuthFlow` is fatal for the current call but safe to retry later
/// - `TokenExchange` / `DirectoryFetch` carry the HTTP status when one exists
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ContactsError {
    #[error("Authentication configuration error: {0}")]
    AuthConfig(String),

    #[error("Authorization failed: {0}")]
    AuthFlow(String),

    #[error("Token exchange failed{}: {message}", status_suffix(.status))]
    TokenExchange { status: Option<u16>, message: String },

    #[error("Directory fetch failed{}: {message}", status_suffix(.status))]
    DirectoryFetch { status: Option<u16>, unauthorized: bool, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (HTTP {code})")).unwrap_or_default()
}

impl ContactsError {
    /// Build a directory failure from an HTTP status, flagging 401 responses.
    pub fn directory_status(status: u16, message: impl Into<String>) -> Self {
        Self::DirectoryFetch {
            status: Some(status),
            unauthorized: status == 401,
            message: message.into(),
        }
    }

    /// Build a directory failure for transport errors (no HTTP status).
    pub fn directory_transport(message: impl Into<String>) -> Self {
        Self::DirectoryFetch { status: None, unauthorized: false, message: message.into() }
    }

    /// True when the remote API rejected the bearer token (HTTP 401).
    ///
    /// Only directory failures participate in the invalidate-and-retry
    /// contract; token endpoint failures are handled by the authenticator.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::DirectoryFetch { unauthorized: true, .. })
    }

    /// Stable label suitable for structured logging.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::AuthConfig(_) => "auth_config",
            Self::AuthFlow(_) => "auth_flow",
            Self::TokenExchange { .. } => "token_exchange",
            Self::DirectoryFetch { .. } => "directory_fetch",
            Self::Config(_) => "config",
            Self::Storage(_) => "storage",
            Self::Security(_) => "security",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for gcontacts operations
pub type Result<T> = std::result::Result<T, ContactsError>;
