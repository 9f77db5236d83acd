//! Port interfaces for authentication
//!
//! These traits define the boundaries between the authenticator and the
//! infrastructure that persists tokens and collects user consent.

use async_trait::async_trait;
use gcontacts_common::auth::{AuthorizationRequest, AuthorizationResponse, TokenSet};
use gcontacts_domain::Result;

/// Durable storage for the single active token set.
///
/// Writes must be durable before returning. No validation is performed here.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored token set, `None` when nothing usable is stored
    async fn get(&self) -> Result<Option<TokenSet>>;

    /// Replace the stored token set as a whole
    async fn set(&self, tokens: &TokenSet) -> Result<()>;

    /// Remove the stored token set (idempotent)
    async fn clear(&self) -> Result<()>;
}

/// Interactive consent step of the authorization code flow.
///
/// Implementations send the user to `request.url` and return the parameters
/// delivered to the redirect URI. Denial, cancellation and timeouts are
/// reported as `ContactsError::AuthFlow`.
#[async_trait]
pub trait AuthorizationPrompt: Send + Sync {
    async fn request_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<AuthorizationResponse>;
}
