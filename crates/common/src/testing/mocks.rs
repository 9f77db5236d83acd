//! Mock implementations of common traits
//!
//! Provides in-memory stand-ins for storage and the OAuth token endpoint.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::auth::{
    validate_state, AuthorizationRequest, AuthorizationResponse, OAuthClientError,
    OAuthClientTrait, TokenSet,
};
use crate::storage::{validate_key, KeyValueStore, StorageError, StorageResult};
use crate::time::Clock;

type StorageData = Arc<Mutex<HashMap<String, String>>>;
type ScriptedResults = Arc<Mutex<VecDeque<Result<TokenSet, OAuthClientError>>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory key-value store with switchable failures.
///
/// # Examples
///
/// ```ignore
/// use gcontacts_common::storage::KeyValueStore;
/// use gcontacts_common::testing::MemoryStore;
///
/// # async fn example() {
/// let store = MemoryStore::new();
/// store.set("key1", "value1").await.unwrap();
/// assert_eq!(store.get("key1").await.unwrap().as_deref(), Some("value1"));
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: StorageData,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `get` fail with `StorageError::Unavailable`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every `set`/`remove` fail with `StorageError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Read a value without going through the async interface.
    #[must_use]
    pub fn snapshot(&self, key: &str) -> Option<String> {
        lock(&self.data).get(key).cloned()
    }

    /// Seed a value directly, bypassing failure switches.
    pub fn insert_raw(&self, key: &str, value: &str) {
        lock(&self.data).insert(key.to_string(), value.to_string());
    }

    /// Number of successful `set` calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.data).is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        Ok(lock(&self.data).get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        lock(&self.data).insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        lock(&self.data).remove(key);
        Ok(())
    }
}

/// Mock OAuth client that simulates the token endpoint without network calls.
///
/// Exchange and refresh results can be scripted; once a script runs out the
/// mock issues a fresh one-hour token set.
#[derive(Clone)]
pub struct MockOAuthClient {
    exchange_results: ScriptedResults,
    refresh_results: ScriptedResults,
    authorization_requests: Arc<AtomicUsize>,
    exchange_calls: Arc<AtomicUsize>,
    refresh_calls: Arc<AtomicUsize>,
    last_refresh_token: Arc<Mutex<Option<String>>>,
    clock: Option<Arc<dyn Clock>>,
}

impl std::fmt::Debug for MockOAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockOAuthClient")
            .field("exchange_calls", &self.exchange_calls())
            .field("refresh_calls", &self.refresh_calls())
            .finish_non_exhaustive()
    }
}

impl Default for MockOAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOAuthClient {
    pub fn new() -> Self {
        Self {
            exchange_results: Arc::default(),
            refresh_results: Arc::default(),
            authorization_requests: Arc::default(),
            exchange_calls: Arc::default(),
            refresh_calls: Arc::default(),
            last_refresh_token: Arc::default(),
            clock: None,
        }
    }

    /// Stamp default token sets using `clock` instead of the system time.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn push_exchange_result(&self, result: Result<TokenSet, OAuthClientError>) {
        lock(&self.exchange_results).push_back(result);
    }

    pub fn push_refresh_result(&self, result: Result<TokenSet, OAuthClientError>) {
        lock(&self.refresh_results).push_back(result);
    }

    #[must_use]
    pub fn authorization_requests(&self) -> usize {
        self.authorization_requests.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Refresh token passed to the most recent refresh call.
    #[must_use]
    pub fn last_refresh_token(&self) -> Option<String> {
        lock(&self.last_refresh_token).clone()
    }

    fn issue(&self, prefix: &str, n: usize) -> TokenSet {
        let now = self.clock.as_ref().map_or_else(Utc::now, |clock| clock.utc_now());
        TokenSet::issued_at(
            format!("{prefix}_access_token_{n}"),
            Some(format!("{prefix}_refresh_token_{n}")),
            3600,
            None,
            now,
        )
    }
}

#[async_trait]
impl OAuthClientTrait for MockOAuthClient {
    fn authorization_request(&self) -> AuthorizationRequest {
        let n = self.authorization_requests.fetch_add(1, Ordering::SeqCst) + 1;
        let state = format!("mock_state_{n}");
        AuthorizationRequest {
            url: format!("https://auth.example.test/authorize?state={state}"),
            state,
            code_verifier: format!("mock_verifier_{n}"),
            redirect_uri: "http://127.0.0.1:8765/callback".to_string(),
        }
    }

    async fn exchange_code(
        &self,
        request: &AuthorizationRequest,
        response: &AuthorizationResponse,
    ) -> Result<TokenSet, OAuthClientError> {
        let n = self.exchange_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !validate_state(&request.state, &response.state) {
            return Err(OAuthClientError::StateMismatch);
        }
        let scripted = lock(&self.exchange_results).pop_front();
        scripted.unwrap_or_else(|| Ok(self.issue("mock", n)))
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        *lock(&self.last_refresh_token) = Some(refresh_token.to_string());
        if refresh_token.is_empty() {
            return Err(OAuthClientError::NoRefreshToken);
        }
        let scripted = lock(&self.refresh_results).pop_front();
        scripted.unwrap_or_else(|| Ok(self.issue("refreshed", n)))
    }
}
