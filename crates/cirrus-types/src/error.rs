use thiserror::Error;

use crate::term::TermKind;

/// Errors produced when parsing or converting terms.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TermError {
    #[error("malformed {kind} text {text:?}: {reason}")]
    Malformed {
        kind: TermKind,
        text: String,
        reason: String,
    },

    #[error("invalid escape sequence in {0:?}")]
    InvalidEscape(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),
}
