//! Wire types for the Google People API (v1)
//!
//! Only the fields requested through the person field mask are modelled.
//! Every field is optional because the API omits empty values.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConnectionsResponse {
    #[serde(default)]
    pub connections: Option<Vec<Person>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub total_people: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub person: Option<Person>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub resource_name: Option<String>,
    pub names: Option<Vec<Name>>,
    pub email_addresses: Option<Vec<TypedValue>>,
    pub phone_numbers: Option<Vec<TypedValue>>,
    pub addresses: Option<Vec<GoogleAddress>>,
    pub organizations: Option<Vec<GoogleOrganization>>,
    pub urls: Option<Vec<TypedValue>>,
    pub birthdays: Option<Vec<GoogleBirthday>>,
    pub photos: Option<Vec<Photo>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    pub display_name: Option<String>,
}

/// Shape shared by email addresses, phone numbers and urls.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TypedValue {
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAddress {
    pub formatted_value: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct GoogleOrganization {
    pub name: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct GoogleBirthday {
    pub date: Option<GoogleDate>,
    pub text: Option<String>,
}

/// Partial date; `year` is absent for birthdays without one.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct GoogleDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Photo {
    pub url: Option<String>,
}

/// Error envelope returned by Google APIs.
#[derive(Debug, Deserialize)]
pub struct GoogleErrorResponse {
    pub error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct GoogleErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
