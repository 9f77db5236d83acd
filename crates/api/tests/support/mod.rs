//! Shared fakes for application-layer tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gcontacts_common::auth::{AuthorizationRequest, AuthorizationResponse};
use gcontacts_common::testing::{MemoryStore, MockClock, MockOAuthClient};
use gcontacts_core::{AuthorizationPrompt, DirectoryClient};
use gcontacts_domain::{Config, Contact, Email, PhoneNumber, Result};
use gcontacts_infra::PersistentTokenStore;
use gcontacts_lib::{AppContext, ContactsController, ContextServices};

/// Consent that is always granted immediately.
#[derive(Default)]
pub struct AutoConsent {
    pub calls: AtomicUsize,
}

#[async_trait]
impl AuthorizationPrompt for AutoConsent {
    async fn request_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<AuthorizationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AuthorizationResponse { code: "consent-code".into(), state: request.state.clone() })
    }
}

/// Directory fake replaying scripted list results.
#[derive(Default)]
pub struct ScriptedDirectory {
    list_results: Mutex<VecDeque<Result<Vec<Contact>>>>,
    search_results: Mutex<VecDeque<Result<Vec<Contact>>>>,
    pub list_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
}

impl ScriptedDirectory {
    pub fn push_list(&self, result: Result<Vec<Contact>>) {
        self.list_results.lock().unwrap().push_back(result);
    }

    pub fn push_search(&self, result: Result<Vec<Contact>>) {
        self.search_results.lock().unwrap().push_back(result);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryClient for ScriptedDirectory {
    async fn list_all(&self, _access_token: &str) -> Result<Vec<Contact>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.list_results.lock().unwrap().pop_front().unwrap_or_else(|| Ok(address_book()))
    }

    async fn search(&self, _access_token: &str, query: &str) -> Result<Vec<Contact>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(scripted) = self.search_results.lock().unwrap().pop_front() {
            return scripted;
        }
        let needle = query.to_lowercase();
        Ok(address_book()
            .into_iter()
            .filter(|contact| contact.name.to_lowercase().contains(&needle))
            .collect())
    }
}

pub fn address_book() -> Vec<Contact> {
    let mut ada = Contact::new("people/c1", "Ada Lovelace");
    ada.emails.push(Email { value: "ada@analytical.engine".into(), kind: Some("work".into()) });

    let mut grace = Contact::new("people/c2", "Grace Hopper");
    grace
        .phone_numbers
        .push(PhoneNumber { value: "+1 555 0100".into(), kind: Some("mobile".into()) });

    let alan = Contact::new("people/c3", "Alan Turing");

    vec![ada, grace, alan]
}

pub struct Harness {
    pub controller: ContactsController,
    pub directory: Arc<ScriptedDirectory>,
    pub prompt: Arc<AutoConsent>,
    pub cache_store: MemoryStore,
    pub token_store: MemoryStore,
    pub clock: MockClock,
}

pub fn harness(config: Config) -> Harness {
    let clock = MockClock::new();
    let directory = Arc::new(ScriptedDirectory::default());
    let prompt = Arc::new(AutoConsent::default());
    let cache_store = MemoryStore::new();
    let token_store = MemoryStore::new();

    let services = ContextServices {
        oauth_client: Some(Arc::new(MockOAuthClient::new().with_clock(Arc::new(clock.clone())))),
        token_store: Arc::new(PersistentTokenStore::new(token_store.clone())),
        prompt: prompt.clone(),
        directory: directory.clone(),
        cache_store: Arc::new(cache_store.clone()),
        clock: Arc::new(clock.clone()),
    };
    let ctx = AppContext::from_services(config, PathBuf::from("unused"), services);

    Harness {
        controller: ContactsController::new(Arc::new(ctx)),
        directory,
        prompt,
        cache_store,
        token_store,
        clock,
    }
}
