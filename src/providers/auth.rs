//! HTTP client for the credential provider.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{AuthOutcome, AuthProvider, ProviderError};
use crate::engine::credentials::Credentials;
use crate::engine::Mode;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Credential provider reached over HTTPS. Sign-up and sign-in are separate
/// endpoints under the same base URL; the API key, when present, rides in
/// an `apikey` header.
pub struct HttpAuthProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl HttpAuthProvider {
    /// Build the client for a provider base URL.
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str, api_key: Option<SecretString>) -> Result<Self> {
        Url::parse(base_url).context("invalid provider URL")?;
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn authenticate(&self, credentials: &Credentials, mode: Mode) -> Result<AuthOutcome> {
        let path = match mode {
            Mode::SignUp => "/signup",
            Mode::SignIn => "/token?grant_type=password",
        };
        let url = self.endpoint(path);
        debug!("auth request: POST {url}");

        let payload = json!({
            "email": credentials.email(),
            "password": credentials.password().expose_secret(),
        });

        let mut request = self.client.post(&url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key.expose_secret());
        }

        let response = request
            .send()
            .await
            .context("auth provider request failed")?;
        let status = response.status();
        if status.is_success() {
            return Ok(AuthOutcome::Accepted);
        }

        // Keep whatever structure the provider gives us; an unparseable
        // body degrades to a status line and still flows through the same
        // recovery path.
        let error = match response.json::<ProviderError>().await {
            Ok(error) => error,
            Err(_) => ProviderError {
                code: None,
                message: format!("{url} - {status}"),
                details: None,
            },
        };
        Ok(AuthOutcome::Rejected(error))
    }
}
