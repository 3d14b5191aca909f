//! The error-classification and email-correction recovery engine.
//!
//! One submission runs top to bottom exactly once: normalize, dispatch to
//! the provider, and on rejection walk the recovery chain (direct
//! suggestion extraction, then a best-effort second opinion from the
//! verification service when the failure looks generic). Every path ends in
//! a [`Decision`]; no error object ever reaches the caller.

pub mod classify;
pub mod credentials;
pub mod suggestion;

use std::sync::Arc;

use tracing::{debug, error};

use crate::providers::{AuthOutcome, AuthProvider, EmailVerifier, ProviderError, RemoteValidation};
use self::credentials::{normalize_email, RawCredentials};

/// Which provider operation a submission targets. Always an explicit flag,
/// never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SignUp,
    SignIn,
}

/// Why a submission was rejected as invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// A local validation rule failed; the message is shown verbatim and
    /// presented distinctly from a remote rejection.
    Validation(String),
    /// The verification service reported the address undeliverable.
    Unverifiable,
}

/// Terminal outcome of one submission attempt; the engine's only output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Sign-up accepted; the caller moves the user on to sign-in.
    Proceed,
    /// A corrected address the user can accept or dismiss.
    ShowSuggestion(String),
    RejectInvalid(RejectReason),
    /// Nothing better to say than the original provider failure.
    ShowGenericFailure,
    /// Session established.
    Success,
}

/// Engine tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    min_password_length: usize,
}

impl EngineConfig {
    /// Default config: 6-character password minimum.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_password_length: 6,
        }
    }

    #[must_use]
    pub fn with_min_password_length(mut self, min_password_length: usize) -> Self {
        self.min_password_length = min_password_length;
        self
    }

    #[must_use]
    pub fn min_password_length(&self) -> usize {
        self.min_password_length
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolver over the credential provider and the email-verification
/// service. No state is shared between attempts; each submission is
/// processed from a fresh context.
pub struct Engine {
    provider: Arc<dyn AuthProvider>,
    verifier: Arc<dyn EmailVerifier>,
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        verifier: Arc<dyn EmailVerifier>,
        config: EngineConfig,
    ) -> Self {
        Self {
            provider,
            verifier,
            config,
        }
    }

    /// Run one submission attempt end to end.
    ///
    /// The machine is acyclic and evaluated top to bottom once: each step
    /// either short-circuits into a terminal [`Decision`] or hands the
    /// failure to the next recovery stage. The caller must not resubmit
    /// while an attempt is unresolved.
    pub async fn resolve(&self, raw: RawCredentials, mode: Mode) -> Decision {
        let credentials = match raw.normalize(self.config.min_password_length()) {
            Ok(credentials) => credentials,
            Err(message) => return Decision::RejectInvalid(RejectReason::Validation(message)),
        };

        let failure = match self.provider.authenticate(&credentials, mode).await {
            Ok(AuthOutcome::Accepted) => {
                return match mode {
                    Mode::SignUp => Decision::Proceed,
                    Mode::SignIn => Decision::Success,
                }
            }
            Ok(AuthOutcome::Rejected(error)) => error,
            Err(err) => {
                // Transport failures carry no structure; fold them into the
                // same shape so recovery sees a uniform input.
                error!("auth provider request failed: {err}");
                ProviderError::from_transport(&err)
            }
        };

        if let Some(candidate) = suggestion::extract_suggestion(&failure, credentials.email()) {
            return Decision::ShowSuggestion(candidate);
        }

        if classify::looks_generic(&failure) {
            return self.consult_verifier(&failure, credentials.email()).await;
        }

        debug!(code = ?failure.code, "provider rejection carried no recoverable signal");
        Decision::ShowGenericFailure
    }

    /// Second-pass verification for failures the provider left unexplained.
    ///
    /// Strictly best-effort: a verifier outage is swallowed here and must
    /// never look worse to the user than the provider failure it was trying
    /// to explain.
    async fn consult_verifier(&self, failure: &ProviderError, email: &str) -> Decision {
        let validation = match self.verifier.verify(email).await {
            Ok(validation) => validation,
            Err(err) => {
                debug!("email verifier unavailable, keeping original failure: {err}");
                return Decision::ShowGenericFailure;
            }
        };
        interpret_remote(&validation, email, failure)
    }
}

fn interpret_remote(
    validation: &RemoteValidation,
    email: &str,
    failure: &ProviderError,
) -> Decision {
    let candidate = validation
        .did_you_mean
        .as_deref()
        .map(normalize_email)
        .filter(|candidate| candidate != email);
    if let Some(candidate) = candidate {
        return Decision::ShowSuggestion(candidate);
    }

    if validation.valid == Some(false) {
        return Decision::RejectInvalid(RejectReason::Unverifiable);
    }

    // Deliverable address, or no verdict at all, yet the provider still
    // refused it. Keep the original failure rather than inventing a new
    // user-facing message.
    debug!(
        status = ?validation.status,
        code = ?failure.code,
        "verifier added nothing actionable to the provider rejection"
    );
    Decision::ShowGenericFailure
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use secrecy::SecretString;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticProvider {
        outcome: AuthOutcome,
    }

    #[async_trait]
    impl AuthProvider for StaticProvider {
        async fn authenticate(
            &self,
            _credentials: &credentials::Credentials,
            _mode: Mode,
        ) -> anyhow::Result<AuthOutcome> {
            Ok(self.outcome.clone())
        }
    }

    struct UnreachableProvider;

    #[async_trait]
    impl AuthProvider for UnreachableProvider {
        async fn authenticate(
            &self,
            _credentials: &credentials::Credentials,
            _mode: Mode,
        ) -> anyhow::Result<AuthOutcome> {
            Err(anyhow!("connection refused"))
        }
    }

    #[derive(Default)]
    struct CountingVerifier {
        calls: AtomicUsize,
        validation: RemoteValidation,
        unavailable: bool,
    }

    impl CountingVerifier {
        fn with_validation(validation: RemoteValidation) -> Self {
            Self {
                validation,
                ..Self::default()
            }
        }

        fn unavailable() -> Self {
            Self {
                unavailable: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmailVerifier for CountingVerifier {
        async fn verify(&self, _email: &str) -> anyhow::Result<RemoteValidation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                return Err(anyhow!("verifier down"));
            }
            Ok(self.validation.clone())
        }
    }

    fn rejection(code: Option<&str>, message: &str, details: Option<&str>) -> AuthOutcome {
        AuthOutcome::Rejected(ProviderError {
            code: code.map(str::to_string),
            message: message.to_string(),
            details: details.map(str::to_string),
        })
    }

    fn engine(provider: Arc<dyn AuthProvider>, verifier: Arc<dyn EmailVerifier>) -> Engine {
        Engine::new(provider, verifier, EngineConfig::new())
    }

    fn raw(email: &str, password: &str) -> RawCredentials {
        RawCredentials {
            email: email.to_string(),
            password: SecretString::from(password.to_string()),
        }
    }

    #[tokio::test]
    async fn invalid_email_rejected_before_dispatch() {
        // UnreachableProvider would error if dispatch ever ran.
        let engine = engine(
            Arc::new(UnreachableProvider),
            Arc::new(CountingVerifier::default()),
        );
        let decision = engine.resolve(raw("not-an-email", "123456"), Mode::SignUp).await;
        assert_eq!(
            decision,
            Decision::RejectInvalid(RejectReason::Validation(
                "Please enter a valid email address".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn short_password_rejected_with_rule_message() {
        let engine = engine(
            Arc::new(UnreachableProvider),
            Arc::new(CountingVerifier::default()),
        );
        let decision = engine.resolve(raw("a@example.com", "123"), Mode::SignIn).await;
        assert_eq!(
            decision,
            Decision::RejectInvalid(RejectReason::Validation(
                "Password must be at least 6 characters".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn sign_in_acceptance_is_success() {
        let engine = engine(
            Arc::new(StaticProvider {
                outcome: AuthOutcome::Accepted,
            }),
            Arc::new(CountingVerifier::default()),
        );
        let decision = engine.resolve(raw("a@example.com", "123456"), Mode::SignIn).await;
        assert_eq!(decision, Decision::Success);
    }

    #[tokio::test]
    async fn sign_up_acceptance_is_proceed() {
        let engine = engine(
            Arc::new(StaticProvider {
                outcome: AuthOutcome::Accepted,
            }),
            Arc::new(CountingVerifier::default()),
        );
        let decision = engine.resolve(raw("a@example.com", "123456"), Mode::SignUp).await;
        assert_eq!(decision, Decision::Proceed);
    }

    #[tokio::test]
    async fn suggestion_in_message_ends_the_attempt() {
        let verifier = Arc::new(CountingVerifier::default());
        let engine = engine(
            Arc::new(StaticProvider {
                outcome: rejection(None, "Did you mean usr@gmail.com?", None),
            }),
            verifier.clone(),
        );
        let decision = engine
            .resolve(raw("usr@gmial.com", "123456"), Mode::SignUp)
            .await;
        assert_eq!(
            decision,
            Decision::ShowSuggestion("usr@gmail.com".to_string())
        );
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn specific_failure_skips_the_verifier() {
        let verifier = Arc::new(CountingVerifier::default());
        let engine = engine(
            Arc::new(StaticProvider {
                outcome: rejection(Some("invalid_credentials"), "Invalid login credentials", None),
            }),
            verifier.clone(),
        );
        let decision = engine.resolve(raw("a@example.com", "123456"), Mode::SignIn).await;
        assert_eq!(decision, Decision::ShowGenericFailure);
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn generic_failure_consults_verifier_exactly_once() {
        let verifier = Arc::new(CountingVerifier::with_validation(RemoteValidation {
            valid: Some(true),
            ..RemoteValidation::default()
        }));
        let engine = engine(
            Arc::new(StaticProvider {
                outcome: rejection(Some("unexpected_failure"), "Signup failed", None),
            }),
            verifier.clone(),
        );
        let decision = engine.resolve(raw("a@example.com", "123456"), Mode::SignUp).await;
        // Independently confirmed deliverable, but the provider rejection
        // stands and is re-surfaced unchanged.
        assert_eq!(decision, Decision::ShowGenericFailure);
        assert_eq!(verifier.calls(), 1);
    }

    #[tokio::test]
    async fn verifier_rejection_becomes_reject_invalid() {
        let verifier = Arc::new(CountingVerifier::with_validation(RemoteValidation {
            valid: Some(false),
            status: Some("invalid".to_string()),
            ..RemoteValidation::default()
        }));
        let engine = engine(
            Arc::new(StaticProvider {
                outcome: rejection(None, "Database error saving new user", None),
            }),
            verifier,
        );
        let decision = engine.resolve(raw("a@example.com", "123456"), Mode::SignUp).await;
        assert_eq!(
            decision,
            Decision::RejectInvalid(RejectReason::Unverifiable)
        );
    }

    #[tokio::test]
    async fn verifier_suggestion_becomes_show_suggestion() {
        let verifier = Arc::new(CountingVerifier::with_validation(RemoteValidation {
            valid: Some(false),
            did_you_mean: Some("a@b.com".to_string()),
            ..RemoteValidation::default()
        }));
        let engine = engine(
            Arc::new(StaticProvider {
                outcome: rejection(Some("unexpected_failure"), "Signup failed", None),
            }),
            verifier,
        );
        let decision = engine.resolve(raw("a@c.com", "123456"), Mode::SignUp).await;
        assert_eq!(decision, Decision::ShowSuggestion("a@b.com".to_string()));
    }

    #[tokio::test]
    async fn verifier_restating_the_email_is_not_a_suggestion() {
        let verifier = Arc::new(CountingVerifier::with_validation(RemoteValidation {
            valid: Some(false),
            did_you_mean: Some("A@B.com".to_string()),
            ..RemoteValidation::default()
        }));
        let engine = engine(
            Arc::new(StaticProvider {
                outcome: rejection(Some("unexpected_failure"), "Signup failed", None),
            }),
            verifier,
        );
        let decision = engine.resolve(raw("a@b.com", "123456"), Mode::SignUp).await;
        assert_eq!(
            decision,
            Decision::RejectInvalid(RejectReason::Unverifiable)
        );
    }

    #[tokio::test]
    async fn verifier_outage_degrades_to_generic_failure() {
        let verifier = Arc::new(CountingVerifier::unavailable());
        let engine = engine(
            Arc::new(StaticProvider {
                outcome: rejection(Some("unexpected_failure"), "Signup failed", None),
            }),
            verifier.clone(),
        );
        let decision = engine.resolve(raw("a@example.com", "123456"), Mode::SignUp).await;
        assert_eq!(decision, Decision::ShowGenericFailure);
        assert_eq!(verifier.calls(), 1);
    }

    #[tokio::test]
    async fn verifier_with_no_verdict_degrades_to_generic_failure() {
        let verifier = Arc::new(CountingVerifier::default());
        let engine = engine(
            Arc::new(StaticProvider {
                outcome: rejection(Some("unexpected_failure"), "Signup failed", None),
            }),
            verifier,
        );
        let decision = engine.resolve(raw("a@example.com", "123456"), Mode::SignUp).await;
        assert_eq!(decision, Decision::ShowGenericFailure);
    }

    #[tokio::test]
    async fn transport_failure_ends_in_generic_failure() {
        let verifier = Arc::new(CountingVerifier::default());
        let engine = engine(Arc::new(UnreachableProvider), verifier.clone());
        let decision = engine.resolve(raw("a@example.com", "123456"), Mode::SignIn).await;
        assert_eq!(decision, Decision::ShowGenericFailure);
        // A bare transport error never looks generic, so no second pass.
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn details_only_suggestion_still_extracted() {
        let engine = engine(
            Arc::new(StaticProvider {
                outcome: rejection(
                    Some("unexpected_failure"),
                    "Signup failed",
                    Some("did_you_mean=usr@gmail.com, source=mx"),
                ),
            }),
            Arc::new(CountingVerifier::default()),
        );
        let decision = engine
            .resolve(raw("usr@gmial.com", "123456"), Mode::SignUp)
            .await;
        assert_eq!(
            decision,
            Decision::ShowSuggestion("usr@gmail.com".to_string())
        );
    }
}
