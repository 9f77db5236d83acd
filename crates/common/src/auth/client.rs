//! OAuth 2.0 client implementation with PKCE support
//!
//! Handles the HTTP side of the authorization code flow:
//! - Authorization URL building (PKCE + state)
//! - Authorization code exchange
//! - Token refresh

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::pkce::{validate_state, PKCEChallenge};
use super::traits::OAuthClientTrait;
use super::types::{
    AuthorizationRequest, AuthorizationResponse, OAuthConfig, OAuthError, TokenResponse, TokenSet,
};
use crate::time::{Clock, SystemClock};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for OAuth client operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// HTTP request failed before a response was received
    RequestFailed(reqwest::Error),

    /// OAuth server returned a structured error
    OAuthError { status: u16, error: OAuthError },

    /// Non-success response without an OAuth error body
    HttpStatus { status: u16, body: String },

    /// State parameter mismatch (CSRF attack detected)
    StateMismatch,

    /// Failed to parse response
    ParseError(String),

    /// No refresh token available
    NoRefreshToken,

    /// Invalid configuration
    ConfigError(String),
}

impl OAuthClientError {
    /// HTTP status of the failed response, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::OAuthError { status, .. } | Self::HttpStatus { status, .. } => Some(*status),
            Self::RequestFailed(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::OAuthError { status, error } => write!(f, "OAuth error ({status}): {error}"),
            Self::HttpStatus { status, body } => {
                write!(f, "Token endpoint returned HTTP {status}: {body}")
            }
            Self::StateMismatch => write!(f, "State mismatch in authorization response"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::NoRefreshToken => write!(f, "No refresh token available"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for OAuthClientError {}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// OAuth 2.0 client with PKCE support
///
/// Implements RFC 6749 (OAuth 2.0) and RFC 7636 (PKCE). The client holds no
/// per-flow state; each [`AuthorizationRequest`] carries its own verifier.
#[derive(Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: Client,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient").field("config", &self.config).finish_non_exhaustive()
    }
}

impl OAuthClient {
    /// Create a new OAuth client with a 30 second request timeout.
    #[must_use]
    pub fn new(config: OAuthConfig) -> Self {
        let http =
            Client::builder().timeout(HTTP_TIMEOUT).build().unwrap_or_else(|_| Client::new());
        Self::with_http_client(config, http)
    }

    #[must_use]
    pub fn with_http_client(config: OAuthConfig, http: Client) -> Self {
        Self { config, http, clock: Arc::new(SystemClock) }
    }

    /// Replace the clock used to stamp token expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the authorization URL together with a fresh PKCE challenge and
    /// state.
    #[must_use]
    pub fn authorization_request(&self) -> AuthorizationRequest {
        let challenge = PKCEChallenge::generate();
        let scope_string = self.config.scope_string();

        let query_string = {
            let mut params: Vec<(&str, &str)> = vec![
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", scope_string.as_str()),
                ("state", challenge.state.as_str()),
                ("code_challenge", challenge.code_challenge.as_str()),
                ("code_challenge_method", challenge.challenge_method()),
            ];
            params.extend(
                self.config.extra_authorize_params().iter().map(|(k, v)| (k.as_str(), v.as_str())),
            );

            params
                .iter()
                .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&")
        };

        AuthorizationRequest {
            url: format!("{}?{}", self.config.authorization_url(), query_string),
            state: challenge.state,
            code_verifier: challenge.code_verifier,
            redirect_uri: self.config.redirect_uri.clone(),
        }
    }

    /// Exchange an authorization code for tokens
    ///
    /// # Errors
    /// Returns error if:
    /// - The returned state does not match the request
    /// - The token endpoint rejects the code
    /// - The response cannot be parsed
    pub async fn exchange_code(
        &self,
        request: &AuthorizationRequest,
        response: &AuthorizationResponse,
    ) -> Result<TokenSet, OAuthClientError> {
        if !validate_state(&request.state, &response.state) {
            return Err(OAuthClientError::StateMismatch);
        }

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("code", response.code.as_str()),
            ("redirect_uri", request.redirect_uri.as_str()),
            ("code_verifier", request.code_verifier.as_str()),
        ];
        if let Some(secret) = self.config.client_secret() {
            form.push(("client_secret", secret));
        }

        debug!(endpoint = %self.config.token_url(), "Exchanging authorization code");
        self.post_token_request(&form).await
    }

    /// Refresh access token using refresh token
    ///
    /// The returned set keeps the supplied refresh token when the server does
    /// not issue a new one.
    ///
    /// # Errors
    /// Returns error if the refresh token is empty, was revoked, or the
    /// request fails.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        if refresh_token.is_empty() {
            return Err(OAuthClientError::NoRefreshToken);
        }

        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("refresh_token", refresh_token),
        ];
        if let Some(secret) = self.config.client_secret() {
            form.push(("client_secret", secret));
        }

        debug!(endpoint = %self.config.token_url(), "Refreshing access token");
        let tokens = self.post_token_request(&form).await?;
        Ok(tokens.with_fallback_refresh_token(Some(refresh_token)))
    }

    async fn post_token_request(
        &self,
        form: &[(&str, &str)],
    ) -> Result<TokenSet, OAuthClientError> {
        let response = self.http.post(self.config.token_url()).form(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<OAuthError>(&body) {
                Ok(error) => OAuthClientError::OAuthError { status: status.as_u16(), error },
                Err(_) => OAuthClientError::HttpStatus { status: status.as_u16(), body },
            });
        }

        let token_response: TokenResponse =
            response.json().await.map_err(|e| OAuthClientError::ParseError(e.to_string()))?;

        Ok(token_response.into_token_set(self.clock.utc_now()))
    }

    /// Get the configured redirect URI
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }

    /// Get a reference to the OAuth configuration
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    fn authorization_request(&self) -> AuthorizationRequest {
        self.authorization_request()
    }

    async fn exchange_code(
        &self,
        request: &AuthorizationRequest,
        response: &AuthorizationResponse,
    ) -> Result<TokenSet, OAuthClientError> {
        self.exchange_code(request, response).await
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        self.refresh_access_token(refresh_token).await
    }
}
