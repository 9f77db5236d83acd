//! # gcontacts Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The Google People API directory client
//! - The loopback OAuth authorization prompt
//! - Token persistence over file or keychain storage
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `gcontacts-core`
//! - Contains all "impure" code (HTTP, sockets, filesystem, environment)

pub mod auth;
pub mod config;
pub mod errors;
pub mod integrations;

// Re-export commonly used items
pub use auth::PersistentTokenStore;
pub use errors::InfraError;
pub use integrations::google::{
    GoogleOAuthSettings, LoopbackAuthorizationPrompt, PeopleDirectoryClient,
};
