//! Testing utilities and helpers
//!
//! - **[`mocks`]**: in-memory `KeyValueStore` and a scripted OAuth client
//! - **[`time`]**: a clock that only moves when advanced

pub mod mocks;
pub mod time;

pub use mocks::{MemoryStore, MockOAuthClient};
pub use time::MockClock;
