//! Contact list commands
//!
//! [`ContactsController`] is the surface a list UI binds to: a snapshot of
//! what to render plus the load, search, filter and sign-out commands.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use gcontacts_core::filter_contacts;
use gcontacts_domain::{Contact, ContactsError, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// What the list view renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactsState {
    pub contacts: Vec<Contact>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct ViewModel {
    /// Last full list returned by `load`
    loaded: Vec<Contact>,
    visible: ContactsState,
}

pub struct ContactsController {
    ctx: Arc<AppContext>,
    view: Mutex<ViewModel>,
}

impl ContactsController {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx, view: Mutex::new(ViewModel::default()) }
    }

    #[must_use]
    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    /// Snapshot of the current view state.
    #[must_use]
    pub fn state(&self) -> ContactsState {
        self.lock().visible.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewModel> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        let mut view = self.lock();
        view.visible.is_loading = true;
        view.visible.error = None;
    }

    /// Record a failure. Whatever was visible before stays visible.
    fn fail(&self, err: &ContactsError) {
        let mut view = self.lock();
        view.visible.is_loading = false;
        view.visible.error = Some(err.to_string());
    }

    /// Load the full contact list, from cache unless `force_refresh`.
    ///
    /// # Errors
    /// Propagates authentication and directory errors; the message is also
    /// kept in [`ContactsState::error`].
    pub async fn load(&self, force_refresh: bool) -> Result<Vec<Contact>> {
        let command = "contacts::load";
        let start = Instant::now();
        self.begin();

        let result = self.ctx.contacts.get_contacts(force_refresh).await;
        log_command_execution(command, start.elapsed(), result.as_ref().err());

        match &result {
            Ok(contacts) => {
                let mut view = self.lock();
                view.loaded = contacts.clone();
                view.visible =
                    ContactsState { contacts: contacts.clone(), is_loading: false, error: None };
            }
            Err(err) => self.fail(err),
        }
        result
    }

    /// Search the directory. A blank query shows the loaded list again.
    ///
    /// # Errors
    /// Propagates authentication and directory errors.
    pub async fn search(&self, query: &str) -> Result<Vec<Contact>> {
        let query = query.trim();
        if query.is_empty() {
            let contacts = self.filter("");
            let mut view = self.lock();
            view.visible.is_loading = false;
            view.visible.error = None;
            return Ok(contacts);
        }

        let command = "contacts::search";
        let start = Instant::now();
        self.begin();

        let result = self.ctx.contacts.search_contacts(query).await;
        log_command_execution(command, start.elapsed(), result.as_ref().err());

        match &result {
            Ok(contacts) => {
                self.lock().visible =
                    ContactsState { contacts: contacts.clone(), is_loading: false, error: None };
            }
            Err(err) => self.fail(err),
        }
        result
    }

    /// Narrow the loaded list locally by name, email or phone number.
    pub fn filter(&self, text: &str) -> Vec<Contact> {
        let mut view = self.lock();
        let matched = filter_contacts(&view.loaded, text);
        debug!(matched = matched.len(), total = view.loaded.len(), "Filtered contacts");
        view.visible.contacts = matched.clone();
        matched
    }

    /// Drop the cached contact list so the next load fetches.
    ///
    /// # Errors
    /// Returns `Storage` when the cache entry cannot be removed.
    pub async fn clear_cache(&self) -> Result<()> {
        let start = Instant::now();
        let result = self.ctx.contacts.clear_cache().await;
        log_command_execution("contacts::clear_cache", start.elapsed(), result.as_ref().err());
        result
    }

    /// Forget stored credentials and everything shown.
    ///
    /// # Errors
    /// Returns `Storage` when the token store cannot be cleared.
    pub async fn logout(&self) -> Result<()> {
        let start = Instant::now();
        let result = self.ctx.authenticator.logout().await;
        log_command_execution("contacts::logout", start.elapsed(), result.as_ref().err());

        if result.is_ok() {
            *self.lock() = ViewModel::default();
            info!("Cleared contact view after sign out");
        }
        result
    }
}
