//! Storage primitives for small persisted values
//!
//! Everything the application persists (the contact cache entry and the
//! OAuth token set) is a single string value under a well-known key, so the
//! storage seam is a plain key-value interface:
//!
//! - [`FileStore`]: one file per key under a data directory
//! - `security::KeychainProvider`: the OS credential store

pub mod error;
pub mod file;

use async_trait::async_trait;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;

/// Asynchronous string key-value store.
///
/// `get` returns `Ok(None)` for absent keys; `remove` is idempotent.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    async fn remove(&self, key: &str) -> StorageResult<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key).await
    }
}

/// Validate a storage key.
///
/// Keys become file names, so only ASCII alphanumerics plus `-`, `_` and `.`
/// are accepted and a leading `.` is rejected.
///
/// # Errors
/// Returns [`StorageError::InvalidKey`] for empty or unsupported keys.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
