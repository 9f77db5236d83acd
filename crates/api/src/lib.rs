//! # gcontacts Application
//!
//! Application layer - session wiring and the commands a UI binds to.
//!
//! This crate contains:
//! - The application context (dependency injection)
//! - `ContactsController`, the contact list view contract
//! - Logging setup shared by the `gcontacts` binary
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::{ContactsController, ContactsState};
pub use context::{AppContext, ContextServices};
