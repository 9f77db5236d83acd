//! # gcontacts Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for token storage, interactive authorization and the
//!   contact directory
//! - The OAuth authenticator state machine
//! - The contact cache and sync coordinator
//!
//! ## Architecture Principles
//! - Only depends on `gcontacts-common` and `gcontacts-domain`
//! - No HTTP, filesystem or platform code
//! - All external dependencies via traits

pub mod auth;
pub mod contacts;

pub use auth::{AuthState, AuthorizationPrompt, OAuthAuthenticator, TokenStore};
pub use contacts::{
    filter_contacts, CacheEntry, CacheMiss, ContactCache, DirectoryClient, SyncCoordinator,
};
