//! Google OAuth settings and the loopback authorization prompt.
//!
//! The prompt binds the host and port of the registered redirect URI, sends
//! the user's browser to the consent page and waits for Google to redirect
//! back with either a code or an error.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use gcontacts_common::auth::{
    validate_state, AuthorizationRequest, AuthorizationResponse, OAuthClient, OAuthConfig,
};
use gcontacts_core::auth::AuthorizationPrompt;
use gcontacts_domain::constants::{
    AUTHORIZATION_TIMEOUT_SECS, CONTACTS_READONLY_SCOPE, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL,
};
use gcontacts_domain::{Config, ContactsError, Result};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use url::Url;

/// Configuration for the Google OAuth client.
#[derive(Debug, Clone)]
pub struct GoogleOAuthSettings {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub scopes: Vec<String>,
}

impl GoogleOAuthSettings {
    /// Google endpoints with the read-only contacts scope.
    pub fn google(
        client_id: impl Into<String>,
        client_secret: Option<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            redirect_uri: redirect_uri.into(),
            authorization_endpoint: GOOGLE_AUTH_URL.to_string(),
            token_endpoint: GOOGLE_TOKEN_URL.to_string(),
            scopes: vec![CONTACTS_READONLY_SCOPE.to_string()],
        }
    }

    /// `None` when no client id is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        config.client_id().map(|id| {
            Self::google(id, config.client_secret().map(str::to_string), &config.redirect_uri)
        })
    }

    #[must_use]
    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }

    /// `access_type=offline` and `prompt=consent` make Google issue a refresh
    /// token on every consent.
    pub fn oauth_config(&self) -> OAuthConfig {
        OAuthConfig::new(
            &self.authorization_endpoint,
            &self.token_endpoint,
            &self.client_id,
            &self.redirect_uri,
            self.scopes.clone(),
        )
        .with_client_secret(self.client_secret.clone())
        .with_authorize_param("access_type", "offline")
        .with_authorize_param("prompt", "consent")
    }

    pub fn build_client(&self) -> OAuthClient {
        OAuthClient::new(self.oauth_config())
    }
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

type CallbackSender = oneshot::Sender<Result<AuthorizationResponse>>;

struct CallbackState {
    expected_state: String,
    sender: Mutex<Option<CallbackSender>>,
}

impl CallbackState {
    fn complete(&self, outcome: Result<AuthorizationResponse>) {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(tx) = sender {
            let _ = tx.send(outcome);
        }
    }
}

/// Interactive authorization through the system browser and a loopback
/// redirect.
#[derive(Debug, Clone)]
pub struct LoopbackAuthorizationPrompt {
    timeout: Duration,
    open_browser: bool,
}

impl Default for LoopbackAuthorizationPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackAuthorizationPrompt {
    pub fn new() -> Self {
        Self { timeout: Duration::from_secs(AUTHORIZATION_TIMEOUT_SECS), open_browser: true }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Skip launching a browser; the URL is only logged.
    #[must_use]
    pub fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    fn launch(&self, url: &str) {
        if !self.open_browser {
            info!(%url, "Waiting for authorization");
            return;
        }

        if let Err(err) = open::that(url) {
            warn!(error = %err, "Could not open a browser for authorization");
            eprintln!("Open this URL in your browser to authorize access:\n{url}");
        }
    }
}

#[async_trait]
impl AuthorizationPrompt for LoopbackAuthorizationPrompt {
    async fn request_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<AuthorizationResponse> {
        let redirect = Url::parse(&request.redirect_uri)
            .map_err(|err| ContactsError::AuthConfig(format!("invalid redirect URI: {err}")))?;
        let host = redirect
            .host_str()
            .ok_or_else(|| ContactsError::AuthConfig("redirect URI has no host".to_string()))?
            .to_string();
        let port = redirect
            .port_or_known_default()
            .ok_or_else(|| ContactsError::AuthConfig("redirect URI has no port".to_string()))?;

        let listener = TcpListener::bind((host.as_str(), port)).await.map_err(|err| {
            ContactsError::AuthFlow(format!("failed to listen on {host}:{port}: {err}"))
        })?;

        let (tx, rx) = oneshot::channel();
        let state = Arc::new(CallbackState {
            expected_state: request.state.clone(),
            sender: Mutex::new(Some(tx)),
        });
        let app = Router::new().route(redirect.path(), get(handle_callback)).with_state(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                error!("OAuth callback server error: {}", err);
            }
        });

        self.launch(&request.url);

        let outcome = tokio::time::timeout(self.timeout, rx).await;

        let _ = shutdown_tx.send(());
        if let Err(err) = server.await {
            warn!(error = %err, "OAuth callback server task failed");
        }

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ContactsError::AuthFlow(
                "authorization callback closed without a response".to_string(),
            )),
            Err(_) => Err(ContactsError::AuthFlow(format!(
                "timed out after {}s waiting for authorization",
                self.timeout.as_secs()
            ))),
        }
    }
}

async fn handle_callback(
    State(state): State<Arc<CallbackState>>,
    Query(params): Query<CallbackParams>,
) -> Html<&'static str> {
    if let Some(error) = params.error {
        let detail = params.error_description.map(|d| format!(": {d}")).unwrap_or_default();
        state.complete(Err(ContactsError::AuthFlow(format!(
            "authorization was not granted ({error}){detail}"
        ))));
        return Html(FAILURE_PAGE);
    }

    let (Some(code), Some(returned_state)) = (params.code, params.state) else {
        state.complete(Err(ContactsError::AuthFlow(
            "authorization callback is missing the code or state parameter".to_string(),
        )));
        return Html(FAILURE_PAGE);
    };

    if !validate_state(&state.expected_state, &returned_state) {
        state.complete(Err(ContactsError::AuthFlow(
            "authorization response state did not match".to_string(),
        )));
        return Html(FAILURE_PAGE);
    }

    state.complete(Ok(AuthorizationResponse { code, state: returned_state }));
    Html(SUCCESS_PAGE)
}

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Authorization Complete</title></head>
<body><h1>Authorization Successful</h1><p>You can close this window.</p></body>
</html>"#;

const FAILURE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Authorization Failed</title></head>
<body><h1>Authorization Failed</h1><p>Invalid or unexpected callback parameters.</p></body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port()
    }

    fn request_for(port: u16) -> AuthorizationRequest {
        AuthorizationRequest {
            url: "https://accounts.example.test/auth".into(),
            state: "expected-state".into(),
            code_verifier: "verifier".into(),
            redirect_uri: format!("http://127.0.0.1:{port}/callback"),
        }
    }

    /// Hit the callback once the listener is up.
    async fn redirect(port: u16, query: &str) {
        let url = format!("http://127.0.0.1:{port}/callback?{query}");
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        for _ in 0..100 {
            if client.get(&url).send().await.is_ok() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("callback server never came up");
    }

    async fn run_prompt(query: &'static str) -> Result<AuthorizationResponse> {
        let port = free_port();
        let prompt = LoopbackAuthorizationPrompt::new().without_browser();
        let request = request_for(port);

        let waiter =
            tokio::spawn(async move { prompt.request_authorization(&request).await });
        redirect(port, query).await;
        waiter.await.unwrap()
    }

    #[tokio::test]
    async fn returns_code_when_state_matches() {
        let response = run_prompt("code=4%2Fabc&state=expected-state").await.unwrap();

        assert_eq!(response.code, "4/abc");
        assert_eq!(response.state, "expected-state");
    }

    #[tokio::test]
    async fn access_denied_is_an_auth_flow_error() {
        let err = run_prompt("error=access_denied&state=expected-state").await.unwrap_err();

        match err {
            ContactsError::AuthFlow(msg) => assert!(msg.contains("access_denied")),
            other => panic!("expected auth flow error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mismatched_state_is_rejected() {
        let err = run_prompt("code=abc&state=forged").await.unwrap_err();
        assert!(matches!(err, ContactsError::AuthFlow(_)));
    }

    #[tokio::test]
    async fn callback_missing_state_fails_without_waiting_for_timeout() {
        let err = run_prompt("code=abc").await.unwrap_err();

        match err {
            ContactsError::AuthFlow(msg) => assert!(msg.contains("missing")),
            other => panic!("expected auth flow error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn callback_missing_code_fails_without_waiting_for_timeout() {
        let err = run_prompt("state=expected-state").await.unwrap_err();
        assert!(matches!(err, ContactsError::AuthFlow(_)));
    }

    #[tokio::test]
    async fn times_out_without_callback() {
        let prompt = LoopbackAuthorizationPrompt::new()
            .without_browser()
            .with_timeout(Duration::from_millis(50));

        let err = prompt.request_authorization(&request_for(free_port())).await.unwrap_err();

        assert!(matches!(err, ContactsError::AuthFlow(_)));
    }

    #[test]
    fn settings_add_offline_access_params() {
        let settings =
            GoogleOAuthSettings::google("client-id", Some("secret".into()), DEFAULT_REDIRECT);
        let request = settings.build_client().authorization_request();

        assert!(request.url.starts_with(GOOGLE_AUTH_URL));
        assert!(request.url.contains("access_type=offline"));
        assert!(request.url.contains("prompt=consent"));
        assert!(request.url.contains("contacts.readonly"));
        assert_eq!(request.redirect_uri, DEFAULT_REDIRECT);
    }

    #[test]
    fn settings_require_client_id() {
        assert!(GoogleOAuthSettings::from_config(&Config::default()).is_none());

        let config = Config { google_client_id: Some("id".into()), ..Config::default() };
        let settings = GoogleOAuthSettings::from_config(&config).unwrap();
        assert_eq!(settings.client_id, "id");
        assert_eq!(settings.client_secret, None);
    }

    const DEFAULT_REDIRECT: &str = "http://127.0.0.1:8765/callback";
}
