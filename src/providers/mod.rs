//! External collaborators: the credential provider and the
//! email-verification service.
//!
//! Both are consumed through async trait objects so the engine can be
//! exercised with in-memory fakes. The HTTP implementations live in
//! [`auth`] and [`verifier`].

pub mod auth;
pub mod verifier;

use async_trait::async_trait;
use serde::Deserialize;

use crate::engine::credentials::Credentials;
use crate::engine::Mode;

/// Opaque failure payload returned by the credential provider.
///
/// Read-only input to the recovery logic; never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl ProviderError {
    /// Fold a transport-level failure into the shape the recovery logic
    /// inspects. It carries no code or details, so it will not match any
    /// recovery pattern and ends in the generic failure path.
    #[must_use]
    pub fn from_transport(err: &anyhow::Error) -> Self {
        Self {
            code: None,
            message: err.to_string(),
            details: None,
        }
    }
}

/// Result of one dispatch to the credential provider.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Accepted,
    Rejected(ProviderError),
}

/// Port for the credential provider. One call per submission, no retries:
/// the rejection text is itself the input to recovery, and a blind retry
/// would duplicate side effects such as account creation.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(
        &self,
        credentials: &Credentials,
        mode: Mode,
    ) -> anyhow::Result<AuthOutcome>;
}

/// Structured verdict from the email-verification service.
///
/// Every field defaults: an absent field means "no additional information",
/// never a hard error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteValidation {
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sub_status: Option<String>,
    #[serde(default)]
    pub did_you_mean: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Port for the email-verification service consulted when the provider
/// hides the real failure behind a generic error.
#[async_trait]
pub trait EmailVerifier: Send + Sync {
    async fn verify(&self, email: &str) -> anyhow::Result<RemoteValidation>;
}
