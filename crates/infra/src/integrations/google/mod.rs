//! Google integration: OAuth settings, loopback consent and the People API.

pub mod normalize;
pub mod oauth;
pub mod people;
pub mod types;

pub use normalize::{normalize_people, normalize_person};
pub use oauth::{GoogleOAuthSettings, LoopbackAuthorizationPrompt};
pub use people::PeopleDirectoryClient;
