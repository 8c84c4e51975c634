//! Error types for the dictionary crate.

use std::path::PathBuf;

use cirrus_store::StoreError;
use cirrus_types::TermError;

use crate::codec::CodecError;

/// Errors that can occur during dictionary operations.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    /// The backing index failed. Always propagated, never retried.
    #[error("data access failure: {0}")]
    DataAccess(#[from] StoreError),

    /// A lookup reached a dictionary before `initialise` wired its index.
    #[error("dictionary {0} is not initialised")]
    NotInitialised(String),

    /// `initialise` was called on a dictionary that was already closed.
    #[error("dictionary {0} is closed and cannot be re-initialised")]
    Closed(String),

    /// Construction-time wiring or configuration error.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An absent sub-identifier was passed to `compose`.
    #[error("null identifier at position {0}")]
    NullIdentifier(usize),

    /// Composite identifier could not be built or parsed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The identifier does not belong to this dictionary's encoding.
    #[error("malformed identifier {id}: {reason}")]
    MalformedId { id: String, reason: String },

    /// Stored or inline term text failed to parse.
    #[error("term error: {0}")]
    Term(#[from] TermError),

    /// Configuration file could not be read or parsed.
    #[error("config file {path}: {reason}")]
    ConfigFile { path: PathBuf, reason: String },
}

impl DictError {
    pub(crate) fn malformed(id: &[u8], reason: impl Into<String>) -> Self {
        Self::MalformedId {
            id: cirrus_types::ValueId::copy_from_slice(id).to_hex(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for dictionary results.
pub type DictResult<T> = Result<T, DictError>;
