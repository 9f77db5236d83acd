//! Modular common utilities shared across gcontacts crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: serde, error and chrono dependencies shared by the tiers
//! - `runtime`: clock and key-value storage
//! - `platform`: OAuth client, keychain (enabled by default)
//! - `native-keychain`: back the keychain with the OS credential store
//! - `test-utils`: in-memory mocks for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod storage;
#[cfg(feature = "runtime")]
pub mod time;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;
#[cfg(feature = "platform")]
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(all(feature = "platform", any(feature = "test-utils", test)))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use auth::{OAuthClient, OAuthClientError, OAuthClientTrait, OAuthConfig, TokenSet};
#[cfg(feature = "platform")]
pub use security::{KeychainError, KeychainProvider};
#[cfg(feature = "runtime")]
pub use storage::{FileStore, KeyValueStore, StorageError, StorageResult};
#[cfg(feature = "runtime")]
pub use time::{Clock, SystemClock};
