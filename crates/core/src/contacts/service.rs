//! Contact retrieval orchestration
//!
//! Decides between the cache and the directory, wraps every directory call in
//! the authenticator's retry-once contract, and writes full lists through to
//! the cache.

use std::sync::Arc;

use gcontacts_domain::{Contact, Result};
use tracing::{debug, info, instrument, warn};

use super::cache::{CacheMiss, ContactCache};
use super::ports::DirectoryClient;
use crate::auth::OAuthAuthenticator;

pub struct SyncCoordinator {
    authenticator: Arc<OAuthAuthenticator>,
    directory: Arc<dyn DirectoryClient>,
    cache: ContactCache,
    use_cache: bool,
}

impl SyncCoordinator {
    pub fn new(
        authenticator: Arc<OAuthAuthenticator>,
        directory: Arc<dyn DirectoryClient>,
        cache: ContactCache,
        use_cache: bool,
    ) -> Self {
        Self { authenticator, directory, cache, use_cache }
    }

    #[must_use]
    pub fn authenticator(&self) -> &Arc<OAuthAuthenticator> {
        &self.authenticator
    }

    /// Return the full contact list.
    ///
    /// With caching enabled and `force_refresh` unset, a fresh cache entry is
    /// returned without touching auth or the network. A successful fetch is
    /// written back to the cache; a failed write is only logged.
    ///
    /// # Errors
    /// Propagates authentication and directory errors. Never returns a
    /// partial list.
    #[instrument(skip(self))]
    pub async fn get_contacts(&self, force_refresh: bool) -> Result<Vec<Contact>> {
        if self.use_cache && !force_refresh {
            match self.cache.read().await {
                Ok(entry) => {
                    debug!(contacts = entry.contacts.len(), "Serving contacts from cache");
                    return Ok(entry.contacts);
                }
                Err(CacheMiss::Missing) => debug!("No cached contacts"),
                Err(miss) => debug!(reason = %miss, "Cache miss"),
            }
        }

        let directory = Arc::clone(&self.directory);
        let contacts = self
            .authenticator
            .invalidate_and_retry_once(|token| {
                let directory = Arc::clone(&directory);
                async move { directory.list_all(&token).await }
            })
            .await?;
        info!(contacts = contacts.len(), "Fetched contacts from directory");

        if self.use_cache {
            if let Err(err) = self.cache.write(&contacts).await {
                warn!(error = %err, "Failed to cache contacts");
            }
        }

        Ok(contacts)
    }

    /// Search the directory directly; results are never cached.
    ///
    /// # Errors
    /// Propagates authentication and directory errors.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>> {
        let directory = Arc::clone(&self.directory);
        let contacts = self
            .authenticator
            .invalidate_and_retry_once(|token| {
                let directory = Arc::clone(&directory);
                let query = query.to_string();
                async move { directory.search(&token, &query).await }
            })
            .await?;
        debug!(results = contacts.len(), "Search completed");
        Ok(contacts)
    }

    /// Drop the cached contact list.
    ///
    /// # Errors
    /// Returns `Storage` when the cache entry cannot be removed.
    pub async fn clear_cache(&self) -> Result<()> {
        self.cache.invalidate().await?;
        info!("Contact cache cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Duration;
    use gcontacts_common::auth::{AuthorizationRequest, AuthorizationResponse, TokenSet};
    use gcontacts_common::testing::{MemoryStore, MockClock, MockOAuthClient};
    use gcontacts_domain::constants::CONTACT_CACHE_KEY;
    use gcontacts_domain::ContactsError;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::auth::{AuthorizationPrompt, TokenStore};

    #[derive(Default)]
    struct MemoryTokenStore(Mutex<Option<TokenSet>>);

    #[async_trait]
    impl TokenStore for MemoryTokenStore {
        async fn get(&self) -> Result<Option<TokenSet>> {
            Ok(self.0.lock().unwrap().clone())
        }

        async fn set(&self, tokens: &TokenSet) -> Result<()> {
            *self.0.lock().unwrap() = Some(tokens.clone());
            Ok(())
        }

        async fn clear(&self) -> Result<()> {
            *self.0.lock().unwrap() = None;
            Ok(())
        }
    }

    #[derive(Default)]
    struct EchoPrompt {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AuthorizationPrompt for EchoPrompt {
        async fn request_authorization(
            &self,
            request: &AuthorizationRequest,
        ) -> Result<AuthorizationResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AuthorizationResponse { code: "code".into(), state: request.state.clone() })
        }
    }

    /// Directory fake that replays scripted list results and records tokens.
    #[derive(Default)]
    struct FakeDirectory {
        list_results: Mutex<VecDeque<Result<Vec<Contact>>>>,
        search_results: Mutex<VecDeque<Result<Vec<Contact>>>>,
        list_calls: AtomicUsize,
        search_calls: AtomicUsize,
        tokens: Mutex<Vec<String>>,
    }

    impl FakeDirectory {
        fn push_list(&self, result: Result<Vec<Contact>>) {
            self.list_results.lock().unwrap().push_back(result);
        }

        fn push_search(&self, result: Result<Vec<Contact>>) {
            self.search_results.lock().unwrap().push_back(result);
        }
    }

    #[async_trait]
    impl DirectoryClient for FakeDirectory {
        async fn list_all(&self, access_token: &str) -> Result<Vec<Contact>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.tokens.lock().unwrap().push(access_token.to_string());
            self.list_results.lock().unwrap().pop_front().unwrap_or_else(|| Ok(sample()))
        }

        async fn search(&self, access_token: &str, query: &str) -> Result<Vec<Contact>> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            self.tokens.lock().unwrap().push(access_token.to_string());
            if let Some(scripted) = self.search_results.lock().unwrap().pop_front() {
                return scripted;
            }
            Ok(sample().into_iter().filter(|c| c.name.contains(query)).collect())
        }
    }

    fn sample() -> Vec<Contact> {
        vec![Contact::new("people/1", "Ada Lovelace"), Contact::new("people/2", "Grace Hopper")]
    }

    struct Harness {
        clock: MockClock,
        store: MemoryStore,
        directory: Arc<FakeDirectory>,
        prompt: Arc<EchoPrompt>,
        coordinator: SyncCoordinator,
    }

    fn harness(use_cache: bool) -> Harness {
        let clock = MockClock::new();
        let store = MemoryStore::new();
        let directory = Arc::new(FakeDirectory::default());
        let prompt = Arc::new(EchoPrompt::default());
        let client = MockOAuthClient::new().with_clock(Arc::new(clock.clone()));
        let authenticator = Arc::new(OAuthAuthenticator::new(
            Some(Arc::new(client)),
            Arc::new(MemoryTokenStore::default()),
            prompt.clone(),
            Arc::new(clock.clone()),
        ));
        let cache = ContactCache::new(Arc::new(store.clone()), Arc::new(clock.clone()));
        let coordinator =
            SyncCoordinator::new(authenticator, directory.clone(), cache, use_cache);
        Harness { clock, store, directory, prompt, coordinator }
    }

    #[tokio::test]
    async fn second_load_within_ttl_is_served_from_cache() {
        let h = harness(true);

        let first = h.coordinator.get_contacts(false).await.unwrap();
        let second = h.coordinator.get_contacts(false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(h.directory.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.prompt.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_cache_triggers_refetch() {
        let h = harness(true);
        h.coordinator.get_contacts(false).await.unwrap();
        h.clock.advance(Duration::minutes(31));

        h.coordinator.get_contacts(false).await.unwrap();

        assert_eq!(h.directory.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn force_refresh_bypasses_cache() {
        let h = harness(true);
        h.coordinator.get_contacts(false).await.unwrap();

        h.coordinator.get_contacts(true).await.unwrap();

        assert_eq!(h.directory.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn disabled_cache_always_fetches_and_never_writes() {
        let h = harness(false);

        h.coordinator.get_contacts(false).await.unwrap();
        h.coordinator.get_contacts(false).await.unwrap();

        assert_eq!(h.directory.list_calls.load(Ordering::SeqCst), 2);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn cache_write_failure_still_returns_contacts() {
        let h = harness(true);
        h.store.set_fail_writes(true);

        let contacts = h.coordinator.get_contacts(false).await.unwrap();

        assert_eq!(contacts, sample());
    }

    #[tokio::test]
    async fn corrupt_cache_falls_through_to_fetch() {
        let h = harness(true);
        h.store.insert_raw(CONTACT_CACHE_KEY, "[]");

        let contacts = h.coordinator.get_contacts(false).await.unwrap();

        assert_eq!(contacts, sample());
        assert_eq!(h.directory.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unauthorized_fetch_reauthorizes_and_retries_once() {
        let h = harness(true);
        h.directory.push_list(Err(ContactsError::directory_status(401, "revoked")));

        let contacts = h.coordinator.get_contacts(false).await.unwrap();

        assert_eq!(contacts, sample());
        assert_eq!(h.directory.list_calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            *h.directory.tokens.lock().unwrap(),
            vec!["mock_access_token_1", "mock_access_token_2"]
        );
        assert_eq!(h.prompt.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn repeated_unauthorized_is_fatal_and_not_cached() {
        let h = harness(true);
        h.directory.push_list(Err(ContactsError::directory_status(401, "revoked")));
        h.directory.push_list(Err(ContactsError::directory_status(401, "still revoked")));

        let err = h.coordinator.get_contacts(false).await.unwrap_err();

        assert!(matches!(err, ContactsError::AuthFlow(_)));
        assert_eq!(h.directory.list_calls.load(Ordering::SeqCst), 2);
        assert!(h.store.snapshot(CONTACT_CACHE_KEY).is_none());
    }

    #[tokio::test]
    async fn search_never_touches_cache() {
        let h = harness(true);

        let results = h.coordinator.search_contacts("Grace").await.unwrap();
        h.coordinator.search_contacts("Grace").await.unwrap();

        assert_eq!(results, vec![Contact::new("people/2", "Grace Hopper")]);
        assert_eq!(h.directory.search_calls.load(Ordering::SeqCst), 2);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_search_reauthorizes_and_retries_once() {
        let h = harness(true);
        h.directory.push_search(Err(ContactsError::directory_status(401, "revoked")));

        let results = h.coordinator.search_contacts("Ada").await.unwrap();

        assert_eq!(results, vec![Contact::new("people/1", "Ada Lovelace")]);
        assert_eq!(h.directory.search_calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            *h.directory.tokens.lock().unwrap(),
            vec!["mock_access_token_1", "mock_access_token_2"]
        );
        assert_eq!(h.prompt.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn repeated_unauthorized_search_is_fatal() {
        let h = harness(true);
        h.directory.push_search(Err(ContactsError::directory_status(401, "revoked")));
        h.directory.push_search(Err(ContactsError::directory_status(401, "still revoked")));

        let err = h.coordinator.search_contacts("Ada").await.unwrap_err();

        assert!(matches!(err, ContactsError::AuthFlow(_)));
        assert_eq!(h.directory.search_calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.prompt.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_cache_forces_next_load_to_fetch() {
        let h = harness(true);
        h.coordinator.get_contacts(false).await.unwrap();

        h.coordinator.clear_cache().await.unwrap();
        h.coordinator.get_contacts(false).await.unwrap();

        assert_eq!(h.directory.list_calls.load(Ordering::SeqCst), 2);
    }
}
