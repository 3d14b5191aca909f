pub mod submit;

use crate::engine::Mode;
use secrecy::SecretString;

/// What the CLI was asked to do.
#[derive(Debug)]
pub enum Action {
    Submit {
        email: String,
        password: SecretString,
        mode: Mode,
        min_password_length: usize,
    },
}
