//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Contact cache
pub const CONTACT_CACHE_TTL_SECONDS: i64 = 30 * 60;
pub const CONTACT_CACHE_KEY: &str = "google-contacts";

// Token persistence
pub const TOKEN_STORE_KEY: &str = "google-oauth-tokens";
pub const KEYCHAIN_SERVICE: &str = "gcontacts";
/// Seconds before expiry at which a stored access token is treated as expired
pub const TOKEN_EXPIRY_SKEW_SECONDS: i64 = 0;

// Google OAuth 2.0
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const CONTACTS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/contacts.readonly";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8765/callback";
pub const AUTHORIZATION_TIMEOUT_SECS: u64 = 300;

// Google People API
pub const PEOPLE_API_BASE_URL: &str = "https://people.googleapis.com";
pub const PERSON_FIELDS: &str =
    "names,emailAddresses,phoneNumbers,photos,addresses,organizations,urls,birthdays";
pub const LIST_PAGE_SIZE: u32 = 1000;
pub const SEARCH_PAGE_SIZE: u32 = 50;
pub const LIST_SORT_ORDER: &str = "FIRST_NAME_ASCENDING";
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Normalization fallbacks
pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_KIND: &str = "unknown";
