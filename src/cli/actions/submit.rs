use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::engine::credentials::RawCredentials;
use crate::engine::{Decision, Engine, EngineConfig, Mode, RejectReason};
use crate::providers::auth::HttpAuthProvider;
use crate::providers::verifier::{DisabledVerifier, HttpEmailVerifier};
use crate::providers::EmailVerifier;
use anyhow::{bail, Result};
use std::sync::Arc;

/// Handle the submit action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    let Action::Submit {
        email,
        password,
        mode,
        min_password_length,
    } = action;

    let provider = Arc::new(HttpAuthProvider::new(
        &globals.provider_url,
        globals.provider_key.clone(),
    )?);

    let verifier: Arc<dyn EmailVerifier> = match &globals.verifier_url {
        Some(url) => Arc::new(HttpEmailVerifier::new(url, globals.verifier_key.clone())?),
        None => Arc::new(DisabledVerifier),
    };

    let config = EngineConfig::new().with_min_password_length(min_password_length);
    let engine = Engine::new(provider, verifier, config);

    let decision = engine
        .resolve(RawCredentials { email, password }, mode)
        .await;

    match decision {
        Decision::Proceed => {
            println!("Account created! You can now sign in.");
            Ok(())
        }
        Decision::Success => {
            println!("Signed in.");
            Ok(())
        }
        Decision::ShowSuggestion(candidate) => bail!("Did you mean {candidate}?"),
        Decision::RejectInvalid(RejectReason::Validation(message)) => bail!("{message}"),
        Decision::RejectInvalid(RejectReason::Unverifiable) => {
            bail!("We couldn't verify this email. Please check and try again.")
        }
        Decision::ShowGenericFailure => match mode {
            Mode::SignUp => bail!("Sign up failed. Please try again."),
            Mode::SignIn => bail!("Sign in failed. Please try again."),
        },
    }
}
