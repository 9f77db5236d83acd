//! OAuth authenticator - single entry point for a valid access token
//!
//! ```text
//! NoToken ──► Authorizing ──► Authorized ──► Expired ──► Refreshing ──► Authorized
//!                                  │                         │
//!                                  └──► Invalidated ──► NoToken ◄────┘ (refresh failed)
//! ```

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use gcontacts_common::auth::{OAuthClientError, OAuthClientTrait, TokenSet};
use gcontacts_common::time::Clock;
use gcontacts_domain::constants::TOKEN_EXPIRY_SKEW_SECONDS;
use gcontacts_domain::{ContactsError, Result};
use tracing::{debug, info, instrument, warn};

use super::ports::{AuthorizationPrompt, TokenStore};

/// Observable authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    NoToken,
    Authorizing,
    Authorized,
    Expired,
    Refreshing,
    Invalidated,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NoToken => "no_token",
            Self::Authorizing => "authorizing",
            Self::Authorized => "authorized",
            Self::Expired => "expired",
            Self::Refreshing => "refreshing",
            Self::Invalidated => "invalidated",
        };
        f.write_str(label)
    }
}

/// Map a token endpoint failure onto the domain error taxonomy.
///
/// `invalid_client` means the configured credentials are wrong, which is a
/// configuration problem rather than a transient exchange failure.
pub fn map_oauth_error(err: OAuthClientError) -> ContactsError {
    match err {
        OAuthClientError::StateMismatch => {
            ContactsError::AuthFlow("authorization response state did not match".to_string())
        }
        OAuthClientError::ConfigError(msg) => ContactsError::AuthConfig(msg),
        OAuthClientError::OAuthError { ref error, .. } if error.error == "invalid_client" => {
            ContactsError::AuthConfig(err.to_string())
        }
        other => {
            ContactsError::TokenExchange { status: other.status(), message: other.to_string() }
        }
    }
}

/// Owns the PKCE authorization flow and the stored token set.
///
/// Constructed without an OAuth client when no client id is configured; every
/// call then fails with `ContactsError::AuthConfig`.
pub struct OAuthAuthenticator {
    client: Option<Arc<dyn OAuthClientTrait>>,
    store: Arc<dyn TokenStore>,
    prompt: Arc<dyn AuthorizationPrompt>,
    clock: Arc<dyn Clock>,
    expiry_skew_seconds: i64,
    state: Mutex<AuthState>,
}

impl fmt::Debug for OAuthAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthAuthenticator")
            .field("configured", &self.client.is_some())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl OAuthAuthenticator {
    pub fn new(
        client: Option<Arc<dyn OAuthClientTrait>>,
        store: Arc<dyn TokenStore>,
        prompt: Arc<dyn AuthorizationPrompt>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            store,
            prompt,
            clock,
            expiry_skew_seconds: TOKEN_EXPIRY_SKEW_SECONDS,
            state: Mutex::new(AuthState::NoToken),
        }
    }

    /// Treat tokens as expired this many seconds before their real expiry.
    #[must_use]
    pub fn with_expiry_skew(mut self, seconds: i64) -> Self {
        self.expiry_skew_seconds = seconds;
        self
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, next: AuthState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = *state;
        if previous != next {
            debug!(from = %previous, to = %next, "Auth state transition");
            *state = next;
        }
    }

    fn client(&self) -> Result<&Arc<dyn OAuthClientTrait>> {
        self.client.as_ref().ok_or_else(|| {
            ContactsError::AuthConfig("Google OAuth client id is not configured".to_string())
        })
    }

    /// Return a usable access token, refreshing or re-authorizing as needed.
    ///
    /// A stored, unexpired token is returned without any network call. An
    /// expired token with a refresh token is refreshed once; if that fails the
    /// stored set is cleared and the interactive flow runs from scratch.
    ///
    /// # Errors
    /// - `AuthConfig` when no client id is configured
    /// - `AuthFlow` when consent is denied, abandoned or times out
    /// - `TokenExchange` when the code exchange is rejected
    /// - `Storage` when the token store cannot be read or written
    #[instrument(skip(self))]
    pub async fn get_valid_access_token(&self) -> Result<String> {
        let client = self.client()?;

        if let Some(tokens) = self.store.get().await? {
            if !tokens.is_expired_at(self.clock.utc_now(), self.expiry_skew_seconds) {
                self.transition(AuthState::Authorized);
                return Ok(tokens.access_token);
            }

            self.transition(AuthState::Expired);
            match tokens.refresh_token.as_deref().filter(|t| !t.is_empty()) {
                Some(refresh_token) => {
                    if let Some(access_token) = self.refresh(client, refresh_token).await? {
                        return Ok(access_token);
                    }
                }
                None => debug!("Stored token expired without a refresh token"),
            }
        }

        self.authorize(client).await
    }

    /// Attempt a refresh grant. `Ok(None)` means the refresh failed and the
    /// stored token set was cleared.
    async fn refresh(
        &self,
        client: &Arc<dyn OAuthClientTrait>,
        refresh_token: &str,
    ) -> Result<Option<String>> {
        self.transition(AuthState::Refreshing);

        match client.refresh_access_token(refresh_token).await {
            Ok(tokens) => {
                let tokens = tokens.with_fallback_refresh_token(Some(refresh_token));
                self.store.set(&tokens).await?;
                self.transition(AuthState::Authorized);
                info!("Access token refreshed");
                Ok(Some(tokens.access_token))
            }
            Err(err) => {
                warn!(error = %err, "Token refresh failed; re-authorization required");
                self.store.clear().await?;
                self.transition(AuthState::Invalidated);
                self.transition(AuthState::NoToken);
                Ok(None)
            }
        }
    }

    async fn authorize(&self, client: &Arc<dyn OAuthClientTrait>) -> Result<String> {
        self.transition(AuthState::Authorizing);
        let request = client.authorization_request();

        let outcome = async {
            let response = self.prompt.request_authorization(&request).await?;
            client.exchange_code(&request, &response).await.map_err(map_oauth_error)
        }
        .await;

        let tokens: TokenSet = match outcome {
            Ok(tokens) => tokens,
            Err(err) => {
                self.transition(AuthState::NoToken);
                return Err(err);
            }
        };

        self.store.set(&tokens).await?;
        self.transition(AuthState::Authorized);
        info!(has_refresh_token = tokens.can_refresh(), "Authorization completed");
        Ok(tokens.access_token)
    }

    /// Clear the stored token set after the API rejected it.
    ///
    /// # Errors
    /// Returns `Storage` if the token store cannot be cleared.
    pub async fn invalidate(&self) -> Result<()> {
        self.store.clear().await?;
        self.transition(AuthState::Invalidated);
        self.transition(AuthState::NoToken);
        Ok(())
    }

    /// Forget the stored credentials.
    ///
    /// # Errors
    /// Returns `Storage` if the token store cannot be cleared.
    pub async fn logout(&self) -> Result<()> {
        self.store.clear().await?;
        self.transition(AuthState::NoToken);
        info!("Signed out");
        Ok(())
    }

    /// Run `call` with a valid access token, recovering once from a 401.
    ///
    /// On an unauthorized error the token set is cleared, a fresh token is
    /// obtained and `call` is retried exactly once. A second unauthorized
    /// error becomes `ContactsError::AuthFlow`; any other error is returned
    /// unchanged.
    ///
    /// # Errors
    /// Propagates token acquisition errors and non-401 errors from `call`.
    pub async fn invalidate_and_retry_once<T, F, Fut>(&self, mut call: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let token = self.get_valid_access_token().await?;
        match call(token).await {
            Err(err) if err.is_unauthorized() => {
                warn!(error = %err, "Access token rejected; re-authorizing once");
                self.invalidate().await?;

                let token = self.get_valid_access_token().await?;
                match call(token).await {
                    Err(err) if err.is_unauthorized() => {
                        self.transition(AuthState::Invalidated);
                        Err(ContactsError::AuthFlow(format!(
                            "access token rejected again after re-authorization: {err}"
                        )))
                    }
                    other => other,
                }
            }
            other => other,
        }
    }
}
