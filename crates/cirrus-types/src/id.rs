use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::TermError;

/// Leading marker bytes of the identifier encodings.
///
/// Kind markers (`RESOURCE`, `BNODE`, `LITERAL`) are disjoint bits so that
/// they never collide with the encoding markers below them.
pub mod markers {
    /// No identifier allocated yet. Never prefixes a persistent identifier.
    pub const NOT_SET: u8 = 1;

    pub const RESOURCE: u8 = 8;
    pub const BNODE: u8 = 16;
    pub const LITERAL: u8 = 32;

    /// Transient identifier whose literal was handed to the delegate.
    pub const THRESHOLD_EXCEEDED: u8 = 1;
    /// Transient identifier carrying the term text inline.
    pub const THRESHOLD_NOT_EXCEEDED: u8 = 2;

    /// Resource split into namespace and local-name identifiers.
    pub const TIERED: u8 = 4;

    /// Resource from a well-known vocabulary.
    pub const KNOWN: u8 = 64;
}

/// Opaque identifier a dictionary assigns to a value.
///
/// Backed by [`Bytes`], so clones share the same allocation; identifiers
/// are copied into caches and composite keys constantly.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueId(Bytes);

impl ValueId {
    /// The single-byte `NOT_SET` identifier.
    pub const NOT_SET: Self = Self(Bytes::from_static(&[markers::NOT_SET]));

    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }

    /// Returns `true` for the `NOT_SET` sentinel.
    pub fn is_not_set(&self) -> bool {
        self.0[..] == [markers::NOT_SET]
    }

    /// First byte, if any.
    pub fn marker(&self) -> Option<u8> {
        self.0.first().copied()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Short hex representation (first 4 bytes).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..self.0.len().min(4)])
    }

    pub fn from_hex(s: &str) -> Result<Self, TermError> {
        let bytes = hex::decode(s).map_err(|e| TermError::InvalidHex(e.to_string()))?;
        Ok(Self(Bytes::from(bytes)))
    }
}

impl Deref for ValueId {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for ValueId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Hash and Eq of `Bytes` match those of `[u8]`, so maps keyed by `ValueId`
// can be queried with a plain slice.
impl Borrow<[u8]> for ValueId {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ValueId {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&[u8]> for ValueId {
    fn from(bytes: &[u8]) -> Self {
        Self::copy_from_slice(bytes)
    }
}

impl fmt::Debug for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueId({})", self.to_hex())
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
