//! Google People API directory client

use std::time::Duration;

use async_trait::async_trait;
use gcontacts_core::contacts::DirectoryClient;
use gcontacts_domain::constants::{
    HTTP_TIMEOUT_SECS, LIST_PAGE_SIZE, LIST_SORT_ORDER, PEOPLE_API_BASE_URL, PERSON_FIELDS,
    SEARCH_PAGE_SIZE,
};
use gcontacts_domain::{Contact, ContactsError, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::normalize::normalize_people;
use super::types::{GoogleErrorResponse, ListConnectionsResponse, SearchResponse};
use crate::errors::InfraError;

/// Reads the signed-in user's connections through the People API.
///
/// Only the first page of connections is requested; see `LIST_PAGE_SIZE`.
#[derive(Debug, Clone)]
pub struct PeopleDirectoryClient {
    http: Client,
    base_url: String,
}

impl PeopleDirectoryClient {
    /// Create a client against the public People API endpoint.
    ///
    /// # Errors
    /// Returns `ContactsError::Internal` if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_base_url(PEOPLE_API_BASE_URL)
    }

    /// Create a client against `base_url` (tests point this at a mock server).
    ///
    /// # Errors
    /// Returns `ContactsError::Internal` if the HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|err| ContactsError::Internal(format!("failed to build HTTP client: {err}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "People API request");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(InfraError::from)?;

        let response = check_status(response).await?;
        response.json::<T>().await.map_err(|err| {
            ContactsError::directory_transport(format!(
                "Failed to parse People API response: {err}"
            ))
        })
    }
}

/// Turn a non-success response into `DirectoryFetch`, keeping Google's error
/// message when the body carries one.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<GoogleErrorResponse>(&body)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or(body);
    warn!(status = status.as_u16(), "People API request failed");

    Err(ContactsError::directory_status(
        status.as_u16(),
        format!("People API error ({status}): {detail}"),
    ))
}

#[async_trait]
impl DirectoryClient for PeopleDirectoryClient {
    #[instrument(skip_all)]
    async fn list_all(&self, access_token: &str) -> Result<Vec<Contact>> {
        let response: ListConnectionsResponse = self
            .get_json(
                "/v1/people/me/connections",
                access_token,
                &[
                    ("personFields", PERSON_FIELDS.to_string()),
                    ("pageSize", LIST_PAGE_SIZE.to_string()),
                    ("sortOrder", LIST_SORT_ORDER.to_string()),
                ],
            )
            .await?;

        if response.next_page_token.is_some() {
            debug!(total = ?response.total_people, "Connections truncated to first page");
        }

        Ok(normalize_people(response.connections.unwrap_or_default()))
    }

    #[instrument(skip_all, fields(query_len = query.len()))]
    async fn search(&self, access_token: &str, query: &str) -> Result<Vec<Contact>> {
        let response: SearchResponse = self
            .get_json(
                "/v1/people:searchContacts",
                access_token,
                &[
                    ("query", query.to_string()),
                    ("readMask", PERSON_FIELDS.to_string()),
                    ("pageSize", SEARCH_PAGE_SIZE.to_string()),
                ],
            )
            .await?;

        let people = response.results.unwrap_or_default().into_iter().filter_map(|r| r.person);
        Ok(normalize_people(people))
    }
}
