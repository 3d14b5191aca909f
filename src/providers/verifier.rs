//! HTTP client for the email-verification service.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{EmailVerifier, RemoteValidation};

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Email-verification service reached over HTTPS. Errors raised here are
/// swallowed by the engine; callers of this client still see them so the
/// degradation can be logged.
pub struct HttpEmailVerifier {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl HttpEmailVerifier {
    /// Build the client for a verification service base URL.
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str, api_key: Option<SecretString>) -> Result<Self> {
        Url::parse(base_url).context("invalid verifier URL")?;
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
}

#[async_trait]
impl EmailVerifier for HttpEmailVerifier {
    async fn verify(&self, email: &str) -> Result<RemoteValidation> {
        let url = format!("{}/v2/validate", self.base_url);
        debug!("verification request: GET {url}");

        let mut query: Vec<(&str, String)> = vec![("email", email.to_string())];
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.expose_secret().to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("email verification request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("{url} - {status}"));
        }

        response
            .json::<RemoteValidation>()
            .await
            .context("email verification response was not JSON")
    }
}

/// Stand-in for deployments without a verification service configured.
/// Reports no additional information so the engine falls back to the
/// original provider error.
#[derive(Debug, Clone)]
pub struct DisabledVerifier;

#[async_trait]
impl EmailVerifier for DisabledVerifier {
    async fn verify(&self, _email: &str) -> Result<RemoteValidation> {
        debug!("email verifier disabled, skipping second-pass validation");
        Ok(RemoteValidation::default())
    }
}
