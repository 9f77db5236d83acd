//! Contact retrieval: directory port, TTL cache, sync coordination and local
//! filtering.

pub mod cache;
pub mod filter;
pub mod ports;
pub mod service;

pub use cache::{CacheEntry, CacheMiss, ContactCache};
pub use filter::{filter_contacts, matches};
pub use ports::DirectoryClient;
pub use service::SyncCoordinator;
