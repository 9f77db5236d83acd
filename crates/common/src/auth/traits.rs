//! Traits for OAuth operations
//!
//! Abstracts the token endpoint so the authenticator can be exercised with
//! scripted responses instead of a live authorization server.

use async_trait::async_trait;

use super::client::OAuthClientError;
use super::types::{AuthorizationRequest, AuthorizationResponse, TokenSet};

/// Trait for OAuth client operations
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Prepare a new authorization request (URL, state, PKCE verifier).
    fn authorization_request(&self) -> AuthorizationRequest;

    /// Exchange authorization code for tokens
    ///
    /// # Errors
    /// Returns error if the state does not match, the exchange fails, or the
    /// response cannot be parsed
    async fn exchange_code(
        &self,
        request: &AuthorizationRequest,
        response: &AuthorizationResponse,
    ) -> Result<TokenSet, OAuthClientError>;

    /// Refresh access token using refresh token
    ///
    /// # Errors
    /// Returns error if refresh fails or token is invalid/revoked
    async fn refresh_access_token(&self, refresh_token: &str)
        -> Result<TokenSet, OAuthClientError>;
}
