//! Runtime configuration shared by every layer.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_REDIRECT_URI;
use crate::errors::ContactsError;

/// Where OAuth tokens are persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    /// OS credential store via `keyring`
    Keychain,
    /// JSON file under the data directory (owner-only permissions)
    #[default]
    File,
}

impl FromStr for TokenBackend {
    type Err = ContactsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keychain" | "keyring" => Ok(Self::Keychain),
            "file" => Ok(Self::File),
            other => Err(ContactsError::Config(format!("unknown token backend '{other}'"))),
        }
    }
}

impl fmt::Display for TokenBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keychain => f.write_str("keychain"),
            Self::File => f.write_str("file"),
        }
    }
}

/// Application configuration.
///
/// The client id is optional here; its absence only becomes an error when an
/// access token is first requested.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub google_client_id: Option<String>,
    #[serde(skip_serializing)]
    pub google_client_secret: Option<String>,
    pub use_cache: bool,
    pub redirect_uri: String,
    pub data_dir: Option<PathBuf>,
    pub token_backend: TokenBackend,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = self.google_client_secret.as_ref().map(|_| "<redacted>");
        f.debug_struct("Config")
            .field("google_client_id", &self.google_client_id)
            .field("google_client_secret", &secret)
            .field("use_cache", &self.use_cache)
            .field("redirect_uri", &self.redirect_uri)
            .field("data_dir", &self.data_dir)
            .field("token_backend", &self.token_backend)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_client_id: None,
            google_client_secret: None,
            use_cache: true,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            data_dir: None,
            token_backend: TokenBackend::default(),
        }
    }
}

impl Config {
    /// Client id with blank values treated as missing.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.google_client_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.google_client_secret.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
