//! # gcontacts Domain
//!
//! Business domain types and models for gcontacts.
//!
//! This crate contains:
//! - The normalized `Contact` model
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other gcontacts crates
//! - Only external dependencies allowed

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
