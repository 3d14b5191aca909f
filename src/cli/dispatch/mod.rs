use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::engine::Mode;
use anyhow::Result;
use secrecy::SecretString;

fn secret(matches: &clap::ArgMatches, id: &str) -> Option<SecretString> {
    matches
        .get_one::<String>(id)
        .map(|s| SecretString::from(s.to_string()))
}

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let provider_url = matches
        .get_one("provider-url")
        .map(|s: &String| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --provider-url"))?;

    let mut globals = GlobalArgs::new(provider_url);
    globals.provider_key = secret(matches, "provider-key");
    globals.verifier_url = matches
        .get_one("verifier-url")
        .map(|s: &String| s.to_string());
    globals.verifier_key = secret(matches, "verifier-key");

    let mode = if matches.get_flag("sign-up") {
        Mode::SignUp
    } else {
        Mode::SignIn
    };

    let action = Action::Submit {
        email: matches
            .get_one("email")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --email"))?,
        password: secret(matches, "password")
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --password"))?,
        mode,
        min_password_length: matches
            .get_one::<usize>("min-password-length")
            .copied()
            .unwrap_or(6),
    };

    Ok((action, globals))
}
