//! `TokenStore` backed by any `KeyValueStore`
//!
//! The token set is persisted as a single JSON value so the access token,
//! refresh token and expiry are always replaced together.

use async_trait::async_trait;
use gcontacts_common::auth::TokenSet;
use gcontacts_common::storage::KeyValueStore;
use gcontacts_core::auth::TokenStore;
use gcontacts_domain::constants::TOKEN_STORE_KEY;
use gcontacts_domain::{ContactsError, Result};
use tracing::{debug, warn};

use crate::errors::InfraError;

#[derive(Debug, Clone)]
pub struct PersistentTokenStore<K> {
    backend: K,
    key: String,
}

impl<K: KeyValueStore> PersistentTokenStore<K> {
    pub fn new(backend: K) -> Self {
        Self { backend, key: TOKEN_STORE_KEY.to_string() }
    }

    /// Store under `key` instead of the default token key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }
}

#[async_trait]
impl<K: KeyValueStore> TokenStore for PersistentTokenStore<K> {
    async fn get(&self) -> Result<Option<TokenSet>> {
        let Some(raw) = self.backend.get(&self.key).await.map_err(InfraError::from)? else {
            return Ok(None);
        };

        match serde_json::from_str::<TokenSet>(&raw) {
            Ok(tokens) => Ok(Some(tokens)),
            Err(err) => {
                // Unreadable tokens force a fresh authorization.
                warn!(error = %err, "Ignoring unparseable stored token set");
                Ok(None)
            }
        }
    }

    async fn set(&self, tokens: &TokenSet) -> Result<()> {
        let raw = serde_json::to_string(tokens)
            .map_err(|err| ContactsError::Internal(format!("encode token set: {err}")))?;
        self.backend.set(&self.key, &raw).await.map_err(InfraError::from)?;
        debug!(has_refresh_token = tokens.can_refresh(), "Token set persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.backend.remove(&self.key).await.map_err(InfraError::from)?;
        debug!("Token set cleared");
        Ok(())
    }
}
