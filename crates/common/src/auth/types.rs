//! OAuth 2.0 types and structures
//!
//! Token sets, token endpoint payloads, provider configuration and the
//! authorization request handed to whatever collects the user's consent.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// OAuth 2.0 access and refresh tokens with metadata
///
/// Persisted as a single JSON value so the access token, refresh token and
/// expiry are always written together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token for API authentication
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// ID token (OpenID Connect), kept when the provider returns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Access token lifetime in seconds as reported by the provider
    #[serde(default)]
    pub expires_in: i64,

    /// Absolute expiration timestamp (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Granted scopes (space-separated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenSet {
    /// Create a `TokenSet` whose expiry is computed relative to `issued_at`.
    ///
    /// A non-positive `expires_in` leaves `expires_at` unset.
    #[must_use]
    pub fn issued_at(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
        scope: Option<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let expires_at = (expires_in > 0).then(|| issued_at + Duration::seconds(expires_in));

        Self {
            access_token,
            refresh_token,
            id_token: None,
            token_type: default_token_type(),
            expires_in,
            expires_at,
            scope,
        }
    }

    /// Check if the access token is expired at `now`, or will expire within
    /// `threshold_seconds`.
    ///
    /// Tokens without an expiry are never considered expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, threshold_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(threshold_seconds) >= expires_at,
            None => false,
        }
    }

    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// Keep `previous` refresh token when the provider omitted one.
    ///
    /// Refresh grants frequently return only a new access token.
    #[must_use]
    pub fn with_fallback_refresh_token(mut self, previous: Option<&str>) -> Self {
        if !self.can_refresh() {
            self.refresh_token = previous.filter(|t| !t.is_empty()).map(str::to_string);
        }
        self
    }
}

/// OAuth token response from the token endpoint (RFC 6749 §5.1).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Convert into a `TokenSet`, stamping expiry relative to `now`.
    #[must_use]
    pub fn into_token_set(self, now: DateTime<Utc>) -> TokenSet {
        let mut tokens = TokenSet::issued_at(
            self.access_token,
            self.refresh_token,
            self.expires_in,
            self.scope,
            now,
        );
        tokens.id_token = self.id_token;
        tokens.token_type = self.token_type;
        tokens
    }
}

/// OAuth configuration for an authorization server.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Authorization endpoint the user is sent to
    pub authorization_endpoint: String,

    /// Token endpoint used for code exchange and refresh
    pub token_endpoint: String,

    pub client_id: String,

    /// Optional client secret (Google desktop clients are issued one)
    pub client_secret: Option<String>,

    /// Redirect URI (loopback for desktop apps)
    pub redirect_uri: String,

    pub scopes: Vec<String>,

    /// Provider-specific parameters appended to the authorization URL
    pub extra_authorize_params: Vec<(String, String)>,
}

impl OAuthConfig {
    #[must_use]
    pub fn new(
        authorization_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            authorization_endpoint: authorization_endpoint.into(),
            token_endpoint: token_endpoint.into(),
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: redirect_uri.into(),
            scopes,
            extra_authorize_params: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_client_secret(mut self, secret: Option<String>) -> Self {
        self.client_secret = secret.filter(|s| !s.is_empty());
        self
    }

    #[must_use]
    pub fn with_authorize_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.extra_authorize_params.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn authorization_url(&self) -> &str {
        &self.authorization_endpoint
    }

    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_endpoint
    }

    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// Get scopes as space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    #[must_use]
    pub fn extra_authorize_params(&self) -> &[(String, String)] {
        &self.extra_authorize_params
    }
}

/// A prepared authorization request.
///
/// Holds everything needed to send the user to the provider and to redeem the
/// resulting code: the full URL, the CSRF `state` and the PKCE verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
    pub code_verifier: String,
    pub redirect_uri: String,
}

/// Parameters returned to the redirect URI after the user consents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResponse {
    pub code: String,
    pub state: String,
}

/// OAuth error response from authorization server
///
/// Standard OAuth 2.0 error response format (RFC 6749 §5.2).
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}
