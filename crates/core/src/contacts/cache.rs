//! Time-boxed cache of the last full contact list.
//!
//! The entry is stored as one JSON value and always replaced wholesale.
//! Reads never fail hard: a missing, stale, unparseable or unreadable entry
//! is reported as a [`CacheMiss`] so the caller falls through to a live fetch.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use gcontacts_common::storage::KeyValueStore;
use gcontacts_common::time::Clock;
use gcontacts_domain::constants::{CONTACT_CACHE_KEY, CONTACT_CACHE_TTL_SECONDS};
use gcontacts_domain::{Contact, ContactsError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub contacts: Vec<Contact>,
    pub cached_at: DateTime<Utc>,
}

/// Why a cache read produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheMiss {
    Missing,
    Expired { cached_at: DateTime<Utc> },
    Corrupt(String),
    Unavailable(String),
}

impl fmt::Display for CacheMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "no cached contacts"),
            Self::Expired { cached_at } => write!(f, "cached contacts from {cached_at} expired"),
            Self::Corrupt(reason) => write!(f, "cached contacts unreadable: {reason}"),
            Self::Unavailable(reason) => write!(f, "cache storage unavailable: {reason}"),
        }
    }
}

pub struct ContactCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key: String,
    ttl: Duration,
}

impl fmt::Debug for ContactCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactCache").field("key", &self.key).field("ttl", &self.ttl).finish()
    }
}

impl ContactCache {
    /// Cache under the default key with the default 30 minute TTL.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            key: CONTACT_CACHE_KEY.to_string(),
            ttl: Duration::seconds(CONTACT_CACHE_TTL_SECONDS),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached entry if it is younger than the TTL.
    ///
    /// # Errors
    /// Returns the [`CacheMiss`] reason when no fresh entry is available.
    pub async fn read(&self) -> std::result::Result<CacheEntry, CacheMiss> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(CacheMiss::Missing),
            Err(err) => {
                warn!(error = %err, "Contact cache read failed");
                return Err(CacheMiss::Unavailable(err.to_string()));
            }
        };

        let entry: CacheEntry = serde_json::from_str(&raw).map_err(|err| {
            warn!(error = %err, "Discarding unparseable contact cache entry");
            CacheMiss::Corrupt(err.to_string())
        })?;

        let age = self.clock.utc_now() - entry.cached_at;
        if age >= self.ttl {
            debug!(age_secs = age.num_seconds(), "Contact cache entry expired");
            return Err(CacheMiss::Expired { cached_at: entry.cached_at });
        }

        debug!(contacts = entry.contacts.len(), age_secs = age.num_seconds(), "Contact cache hit");
        Ok(entry)
    }

    /// Replace the cached entry, stamped with the current time.
    ///
    /// # Errors
    /// Returns `Storage` when the entry cannot be serialized or written.
    pub async fn write(&self, contacts: &[Contact]) -> Result<()> {
        let entry = CacheEntry { contacts: contacts.to_vec(), cached_at: self.clock.utc_now() };
        let raw = serde_json::to_string(&entry)
            .map_err(|err| ContactsError::Storage(format!("encode contact cache: {err}")))?;

        self.store
            .set(&self.key, &raw)
            .await
            .map_err(|err| ContactsError::Storage(format!("write contact cache: {err}")))?;
        debug!(contacts = contacts.len(), "Contact cache written");
        Ok(())
    }

    /// Remove the cached entry outright.
    ///
    /// # Errors
    /// Returns `Storage` when the entry cannot be removed.
    pub async fn invalidate(&self) -> Result<()> {
        self.store
            .remove(&self.key)
            .await
            .map_err(|err| ContactsError::Storage(format!("clear contact cache: {err}")))
    }
}
