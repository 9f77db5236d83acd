//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If no client id is set there, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. Without any file, the environment values (possibly empty) are used
//!
//! ## Environment Variables
//! - `GCONTACTS_GOOGLE_CLIENT_ID`: OAuth client id
//! - `GCONTACTS_GOOGLE_CLIENT_SECRET`: OAuth client secret (optional)
//! - `GCONTACTS_USE_CACHE`: Whether the contact cache is used (true/false)
//! - `GCONTACTS_REDIRECT_URI`: Loopback redirect URI registered with Google
//! - `GCONTACTS_DATA_DIR`: Directory for the cache and file token store
//! - `GCONTACTS_TOKEN_BACKEND`: `file` or `keychain`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./gcontacts.toml` or `./gcontacts.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. `<config dir>/gcontacts/config.toml` or `config.json`
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use gcontacts_domain::{Config, ContactsError, Result, TokenBackend};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["gcontacts.toml", "gcontacts.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// Environment variables win when they provide a client id. Otherwise a
/// config file is used when one exists. A missing client id is not an error
/// here; it surfaces when an access token is first requested.
///
/// # Errors
/// Returns `ContactsError::Config` if a value is malformed or a config file
/// cannot be parsed.
pub fn load() -> Result<Config> {
    let from_env = load_from_env()?;
    if from_env.client_id().is_some() {
        tracing::info!("Configuration loaded from environment variables");
        return Ok(from_env);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No config file found; using environment and defaults");
            Ok(from_env)
        }
    }
}

/// Load configuration from environment variables
///
/// Unset variables keep their defaults.
///
/// # Errors
/// Returns `ContactsError::Config` if a variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let token_backend = match env_opt("GCONTACTS_TOKEN_BACKEND") {
        Some(value) => value.parse::<TokenBackend>()?,
        None => defaults.token_backend,
    };

    Ok(Config {
        google_client_id: env_opt("GCONTACTS_GOOGLE_CLIENT_ID"),
        google_client_secret: env_opt("GCONTACTS_GOOGLE_CLIENT_SECRET"),
        use_cache: env_bool("GCONTACTS_USE_CACHE", defaults.use_cache),
        redirect_uri: env_opt("GCONTACTS_REDIRECT_URI").unwrap_or(defaults.redirect_uri),
        data_dir: env_opt("GCONTACTS_DATA_DIR").map(PathBuf::from),
        token_backend,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ContactsError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ContactsError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ContactsError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ContactsError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `ContactsError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ContactsError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ContactsError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ContactsError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Some(config_dir) = dirs::config_dir() {
        dirs.push(config_dir.join("gcontacts"));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Directory for the cache and file token store when none is configured:
/// the platform data dir joined with `gcontacts`, else `./.gcontacts`.
#[must_use]
pub fn resolve_data_dir(config: &Config) -> PathBuf {
    config.data_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .map(|dir| dir.join("gcontacts"))
            .unwrap_or_else(|| PathBuf::from(".gcontacts"))
    })
}

/// Get an environment variable, treating blank values as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ENV_KEYS: [&str; 6] = [
        "GCONTACTS_GOOGLE_CLIENT_ID",
        "GCONTACTS_GOOGLE_CLIENT_SECRET",
        "GCONTACTS_USE_CACHE",
        "GCONTACTS_REDIRECT_URI",
        "GCONTACTS_DATA_DIR",
        "GCONTACTS_TOKEN_BACKEND",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        (temp_file, path)
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("GCONTACTS_TEST_BOOL_YES", "Yes");
        std::env::set_var("GCONTACTS_TEST_BOOL_OFF", "off");

        assert!(env_bool("GCONTACTS_TEST_BOOL_YES", false));
        assert!(!env_bool("GCONTACTS_TEST_BOOL_OFF", true));

        std::env::remove_var("GCONTACTS_TEST_BOOL_MISSING");
        assert!(env_bool("GCONTACTS_TEST_BOOL_MISSING", true));

        std::env::remove_var("GCONTACTS_TEST_BOOL_YES");
        std::env::remove_var("GCONTACTS_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("GCONTACTS_GOOGLE_CLIENT_ID", "client.apps.googleusercontent.com");
        std::env::set_var("GCONTACTS_GOOGLE_CLIENT_SECRET", "shh");
        std::env::set_var("GCONTACTS_USE_CACHE", "false");
        std::env::set_var("GCONTACTS_REDIRECT_URI", "http://127.0.0.1:9000/callback");
        std::env::set_var("GCONTACTS_DATA_DIR", "/tmp/gcontacts-test");
        std::env::set_var("GCONTACTS_TOKEN_BACKEND", "keychain");

        let config = load_from_env().unwrap();
        clear_env();

        assert_eq!(config.client_id(), Some("client.apps.googleusercontent.com"));
        assert_eq!(config.client_secret(), Some("shh"));
        assert!(!config.use_cache);
        assert_eq!(config.redirect_uri, "http://127.0.0.1:9000/callback");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/gcontacts-test")));
        assert_eq!(config.token_backend, TokenBackend::Keychain);
    }

    #[test]
    fn test_load_from_env_defaults_when_unset() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let config = load_from_env().unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_env_invalid_backend() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("GCONTACTS_TOKEN_BACKEND", "vault");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(ContactsError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_prefers_env_client_id() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("GCONTACTS_GOOGLE_CLIENT_ID", "from-env");

        let config = load().unwrap();
        clear_env();

        assert_eq!(config.client_id(), Some("from-env"));
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
google_client_id = "from-file"
google_client_secret = "secret"
use_cache = false
token_backend = "keychain"
"#;
        let (_temp, path) = temp_config(toml_content, "toml");

        let config = load_from_file(Some(path.clone())).unwrap();

        assert_eq!(config.client_id(), Some("from-file"));
        assert!(!config.use_cache);
        assert_eq!(config.token_backend, TokenBackend::Keychain);
        assert_eq!(config.redirect_uri, Config::default().redirect_uri);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{ "google_client_id": "json-id", "data_dir": "/var/tmp/gc" }"#;
        let (_temp, path) = temp_config(json_content, "json");

        let config = load_from_file(Some(path.clone())).unwrap();

        assert_eq!(config.client_id(), Some("json-id"));
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/tmp/gc")));
        assert!(config.use_cache);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/gcontacts.toml")));
        assert!(matches!(result, Err(ContactsError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let (_temp, path) = temp_config(r#"{ "this is": "not valid json" "#, "json");

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_err(), "Should fail with invalid JSON");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_resolve_data_dir_prefers_configured_path() {
        let config = Config { data_dir: Some(PathBuf::from("/srv/gc")), ..Config::default() };
        assert_eq!(resolve_data_dir(&config), PathBuf::from("/srv/gc"));

        let fallback = resolve_data_dir(&Config::default());
        assert!(fallback.ends_with("gcontacts") || fallback.ends_with(".gcontacts"));
    }
}
