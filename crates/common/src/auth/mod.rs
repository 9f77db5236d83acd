//! Core OAuth 2.0 + PKCE Infrastructure
//!
//! Provider-agnostic pieces of the authorization code flow for desktop
//! clients using a loopback redirect.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  OAuthClientTrait    │  Seam used by the authenticator
//! └─────────┬────────────┘
//!           │
//!           ├──► OAuthClient     (token endpoint over reqwest)
//!           │
//!           └──► PKCE utilities  (verifier, challenge, state)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use gcontacts_common::auth::{AuthorizationResponse, OAuthClient, OAuthConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OAuthConfig::new(
//!     "https://accounts.google.com/o/oauth2/v2/auth",
//!     "https://oauth2.googleapis.com/token",
//!     "your_client_id",
//!     "http://127.0.0.1:8765/callback",
//!     vec!["https://www.googleapis.com/auth/contacts.readonly".to_string()],
//! );
//! let client = OAuthClient::new(config);
//!
//! let request = client.authorization_request();
//! // ... send the user to request.url and capture the redirect ...
//! let response = AuthorizationResponse { code: "code".into(), state: request.state.clone() };
//! let tokens = client.exchange_code(&request, &response).await?;
//! # let _ = tokens;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenSet`, `OAuthConfig`, authorization request/response
//! - **[`pkce`]**: PKCE challenge generation and state validation
//! - **[`client`]**: OAuth HTTP client for token exchange and refresh
//! - **[`traits`]**: `OAuthClientTrait` for substituting the client in tests

pub mod client;
pub mod pkce;
pub mod traits;
pub mod types;

// Re-export commonly used types and functions
pub use client::{OAuthClient, OAuthClientError};
pub use pkce::{generate_code_challenge, generate_code_verifier, generate_state, validate_state};
pub use pkce::PKCEChallenge;
pub use traits::OAuthClientTrait;
pub use types::{
    AuthorizationRequest, AuthorizationResponse, OAuthConfig, OAuthError, TokenResponse, TokenSet,
};
