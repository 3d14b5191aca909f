//! Credential validation and normalization.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

/// Raw form input for one submission attempt.
#[derive(Debug)]
pub struct RawCredentials {
    pub email: String,
    pub password: SecretString,
}

/// Credentials accepted by the normalizer. The email is trimmed and
/// lower-cased; this form is the canonical identity for every later
/// equality check (for example "is the suggestion different from what was
/// submitted").
#[derive(Debug)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

impl RawCredentials {
    /// Validate and canonicalize the submission. Rules are checked in
    /// order and the first violation wins; there is no partial acceptance.
    ///
    /// # Errors
    /// Returns the violated rule's user-facing message.
    pub fn normalize(self, min_password_length: usize) -> Result<Credentials, String> {
        let email = normalize_email(&self.email);
        if !valid_email(&email) {
            return Err("Please enter a valid email address".to_string());
        }
        if self.password.expose_secret().chars().count() < min_password_length {
            return Err(format!(
                "Password must be at least {min_password_length} characters"
            ));
        }
        Ok(Credentials {
            email,
            password: self.password,
        })
    }
}

/// Normalize an email for identity comparisons.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}
