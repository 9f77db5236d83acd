//! Application context - dependency injection container
//!
//! Built once per process and shared by reference. Every adapter is chosen
//! here from [`Config`]; nothing below this layer reads configuration.

use std::path::PathBuf;
use std::sync::Arc;

use gcontacts_common::auth::OAuthClientTrait;
use gcontacts_common::security::KeychainProvider;
use gcontacts_common::storage::{FileStore, KeyValueStore};
use gcontacts_common::time::{Clock, SystemClock};
use gcontacts_core::{
    AuthorizationPrompt, ContactCache, DirectoryClient, OAuthAuthenticator, SyncCoordinator,
    TokenStore,
};
use gcontacts_domain::constants::KEYCHAIN_SERVICE;
use gcontacts_domain::{Config, Result, TokenBackend};
use gcontacts_infra::config::resolve_data_dir;
use gcontacts_infra::{
    GoogleOAuthSettings, LoopbackAuthorizationPrompt, PeopleDirectoryClient, PersistentTokenStore,
};
use tracing::{debug, info, warn};

/// Adapters behind the core ports.
///
/// [`AppContext::from_config`] fills these with the production adapters;
/// tests hand in fakes.
pub struct ContextServices {
    /// `None` when no client id is configured
    pub oauth_client: Option<Arc<dyn OAuthClientTrait>>,
    pub token_store: Arc<dyn TokenStore>,
    pub prompt: Arc<dyn AuthorizationPrompt>,
    pub directory: Arc<dyn DirectoryClient>,
    pub cache_store: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
}

/// Application context - holds the configured session and its services
pub struct AppContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub authenticator: Arc<OAuthAuthenticator>,
    pub contacts: Arc<SyncCoordinator>,
}

impl AppContext {
    /// Load configuration from the environment or a config file and wire the
    /// production adapters.
    ///
    /// # Errors
    /// Returns `Config` when the configuration cannot be read and `Internal`
    /// when the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let config = gcontacts_infra::config::load()?;
        Self::from_config(config)
    }

    /// Wire the production adapters for `config`.
    ///
    /// A missing client id is not an error here: cached contacts still load
    /// and the first token request reports `AuthConfig`.
    ///
    /// # Errors
    /// Returns `Internal` when the HTTP client cannot be built.
    pub fn from_config(config: Config) -> Result<Self> {
        let data_dir = resolve_data_dir(&config);
        let files = Arc::new(FileStore::new(data_dir.clone()));

        let token_store: Arc<dyn TokenStore> = match config.token_backend {
            TokenBackend::File => Arc::new(PersistentTokenStore::new(Arc::clone(&files))),
            TokenBackend::Keychain => {
                Arc::new(PersistentTokenStore::new(KeychainProvider::new(KEYCHAIN_SERVICE)))
            }
        };

        let oauth_client = match GoogleOAuthSettings::from_config(&config) {
            Some(settings) => {
                let client: Arc<dyn OAuthClientTrait> = Arc::new(settings.build_client());
                Some(client)
            }
            None => {
                warn!("Google client id is not configured; only cached contacts are available");
                None
            }
        };

        let services = ContextServices {
            oauth_client,
            token_store,
            prompt: Arc::new(LoopbackAuthorizationPrompt::new()),
            directory: Arc::new(PeopleDirectoryClient::new()?),
            cache_store: files,
            clock: Arc::new(SystemClock),
        };

        info!(
            data_dir = %data_dir.display(),
            token_backend = %config.token_backend,
            use_cache = config.use_cache,
            "Application context initialized"
        );
        Ok(Self::from_services(config, data_dir, services))
    }

    /// Assemble the session from explicit adapters.
    pub fn from_services(config: Config, data_dir: PathBuf, services: ContextServices) -> Self {
        let authenticator = Arc::new(OAuthAuthenticator::new(
            services.oauth_client,
            services.token_store,
            services.prompt,
            Arc::clone(&services.clock),
        ));
        let cache = ContactCache::new(services.cache_store, services.clock);
        let contacts = Arc::new(SyncCoordinator::new(
            Arc::clone(&authenticator),
            services.directory,
            cache,
            config.use_cache,
        ));
        debug!(use_cache = config.use_cache, "Contact services assembled");

        Self { config, data_dir, authenticator, contacts }
    }
}
