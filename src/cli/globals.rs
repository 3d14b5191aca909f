use secrecy::SecretString;

/// Endpoint settings shared by the action handlers. API keys are wrapped so
/// they never show up in logs or `Debug` output.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub provider_url: String,
    pub provider_key: Option<SecretString>,
    pub verifier_url: Option<String>,
    pub verifier_key: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(provider_url: String) -> Self {
        Self {
            provider_url,
            provider_key: None,
            verifier_url: None,
            verifier_key: None,
        }
    }
}
