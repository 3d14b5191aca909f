//! # Emendo
//!
//! Credential submission with email-correction recovery.
//!
//! `emendo` submits an email/password pair to a remote credential provider
//! and, when the provider rejects the attempt with an ambiguous or generic
//! failure, tries to recover a corrected email address before surfacing an
//! error. Recovery runs in strict order: the provider's own error text is
//! searched for an embedded "did you mean" correction, and only when that
//! yields nothing and the failure looks like a masked downstream problem is
//! an external email-verification service consulted for a second opinion.
//!
//! The engine's single output is a [`engine::Decision`]; rendering it is the
//! caller's job. The bundled CLI is one such caller.

pub mod cli;
pub mod engine;
pub mod providers;
