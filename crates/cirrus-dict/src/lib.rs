//! RDF term dictionaries for the Cirrus store.
//!
//! A dictionary converts RDF terms into compact binary identifiers used as
//! storage keys, and back. Dictionaries are composed into chains, each layer
//! wrapping the next:
//!
//! ```text
//! CountedDictionary                 null handling, lookup counters, lifecycle
//!   CacheDictionary (first-level)   LRU caches for results produced below it
//!     KnownTermsDictionary          short ids for well-known vocabularies
//!       TransientDictionary         the term text is the id
//!         CacheDictionary (cumulative)
//!           PersistentDictionary    hash ids with bounded linear probing
//! ```
//!
//! [`ChainBuilder`] assembles this stack (or the [`ThreeTieredDictionary`]
//! variant) from a [`DictionaryConfig`].
//!
//! # Identifier encodings
//!
//! | Producer | Leading bytes |
//! |---|---|
//! | [`PersistentDictionary`] | kind marker, then a 16-byte hash |
//! | [`TransientDictionary`] | `THRESHOLD_NOT_EXCEEDED` + kind, or `THRESHOLD_EXCEEDED` + id |
//! | [`KnownTermsDictionary`] | `KNOWN` + `RESOURCE`, then a 12-byte hash |
//! | [`ThreeTieredDictionary`] | `TIERED`, then namespace id and local-name id |
//! | [`SequenceStringDictionary`] | 8-byte big-endian counter |
//!
//! Marker values live in [`cirrus_types::markers`].
//!
//! # Caching protocol
//!
//! Each top-level lookup carries a [`LookupContext`]. A dictionary that
//! produces a value itself marks the context fresh; the nearest enclosing
//! cache consumes the mark. A [`FirstLevel`] cache stores only fresh
//! results, a [`Cumulative`] cache stores everything.

mod allocator;
pub mod cache;
pub mod chain;
pub mod codec;
pub mod config;
pub mod context;
pub mod counted;
pub mod dictionary;
pub mod error;
pub mod known;
pub mod persistent;
pub mod sequence_string;
pub mod strategy;
pub mod tiered;
pub mod transient;

#[cfg(test)]
mod testing;

pub use allocator::MAX_PROBES;
pub use cache::{CacheDictionary, CacheHandle, CacheStats};
pub use chain::{ChainBuilder, TermDictionary};
pub use codec::CodecError;
pub use config::{CacheConfig, DictionaryConfig, KnownTermsConfig, TransientConfig};
pub use context::{LookupContext, Origin};
pub use counted::{CountedDictionary, LookupStats};
pub use dictionary::Dictionary;
pub use error::{DictError, DictResult};
pub use known::KnownTermsDictionary;
pub use persistent::PersistentDictionary;
pub use sequence_string::SequenceStringDictionary;
pub use strategy::{CacheStrategy, Cumulative, FirstLevel};
pub use tiered::ThreeTieredDictionary;
pub use transient::TransientDictionary;
