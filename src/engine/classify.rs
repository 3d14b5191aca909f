//! Judgment of generic/opaque provider failures.

use regex::Regex;

use crate::providers::ProviderError;

/// Error code the provider uses when it masks a downstream failure.
const OPAQUE_ERROR_CODE: &str = "unexpected_failure";

/// Whether a provider rejection is hiding a more specific underlying cause.
///
/// The provider is known to mask downstream constraint violations behind a
/// catch-all error code or a canned database-failure message; only those
/// warrant a second, independent verification pass.
pub fn looks_generic(error: &ProviderError) -> bool {
    if error.code.as_deref() == Some(OPAQUE_ERROR_CODE) {
        return true;
    }
    Regex::new(r"(?i)database error saving new user")
        .is_ok_and(|regex| regex.is_match(&error.message))
}
