//! Port interfaces for the remote contacts directory

use async_trait::async_trait;
use gcontacts_domain::{Contact, Result};

/// Typed access to the user's contact directory.
///
/// Implementations return already normalized contacts in provider order.
/// Failures are `ContactsError::DirectoryFetch`; an HTTP 401 must set
/// `unauthorized` so callers can re-authorize.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Every connection of the signed-in user, sorted by first name
    async fn list_all(&self, access_token: &str) -> Result<Vec<Contact>>;

    /// Server-side search over the user's contacts
    async fn search(&self, access_token: &str, query: &str) -> Result<Vec<Contact>>;
}
