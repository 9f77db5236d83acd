//! Access token lifecycle: acquire, persist, refresh, recover from
//! invalidation.

pub mod authenticator;
pub mod ports;

pub use authenticator::{map_oauth_error, AuthState, OAuthAuthenticator};
pub use ports::{AuthorizationPrompt, TokenStore};
