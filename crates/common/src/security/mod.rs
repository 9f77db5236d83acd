//! Security primitives and utilities

pub mod keychain;

pub use keychain::{KeychainError, KeychainProvider};
