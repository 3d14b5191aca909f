//! Extraction of a corrected email from a failed provider response.

use regex::Regex;

use super::credentials::normalize_email;
use crate::providers::ProviderError;

/// Pull a corrected email out of a provider rejection, in strict priority
/// order: the human-readable message first, then the structured details.
/// Providers populate one or the other inconsistently and the message form
/// is the more common signal.
///
/// A candidate equal to the already-normalized submitted email is not a
/// suggestion; the provider is only restating the input.
pub fn extract_suggestion(error: &ProviderError, submitted_email: &str) -> Option<String> {
    from_message(&error.message)
        .or_else(|| error.details.as_deref().and_then(from_details))
        .map(|candidate| normalize_email(&candidate))
        .filter(|candidate| candidate != submitted_email)
}

/// "Did you mean <candidate>?" in the provider's message. The candidate is
/// terminated by whitespace or `?`.
fn from_message(message: &str) -> Option<String> {
    capture(r"(?i)did you mean\s+([^?\s]+)\??", message)
}

/// `did_you_mean=<candidate>` key-value token in the detail field. The
/// candidate is terminated by comma or whitespace.
fn from_details(details: &str) -> Option<String> {
    capture(r"(?i)did_you_mean=([^,\s]+)", details)
}

fn capture(pattern: &str, haystack: &str) -> Option<String> {
    Regex::new(pattern)
        .ok()?
        .captures(haystack)
        .and_then(|captures| captures.get(1))
        .map(|candidate| candidate.as_str().to_string())
}
