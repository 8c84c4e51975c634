use std::sync::Arc;

use cirrus_types::ValueId;

use crate::error::StoreResult;

/// Bidirectional text ↔ identifier index backing a dictionary.
///
/// All implementations must satisfy these invariants:
/// - `get(text)` and `get_quick(id)` are inverse for every stored pair.
/// - `put_quick` overwrites: a later pair wins over an earlier pair sharing
///   either its text or its identifier.
/// - Concurrent calls are safe; the index provides no multi-call atomicity.
/// - All backend failures are returned as errors, never silently ignored.
pub trait TermIndex: Send + Sync {
    /// Identifier stored for `text`, or `Ok(None)` if none is stored.
    fn get(&self, text: &str) -> StoreResult<Option<ValueId>>;

    /// Text stored for `id`, or `Ok(None)` if none is stored.
    fn get_quick(&self, id: &[u8]) -> StoreResult<Option<String>>;

    /// Store the pair `(text, id)` in both directions.
    fn put_quick(&self, text: &str, id: &ValueId) -> StoreResult<()>;

    /// Whether any text is stored under `id`.
    fn contains(&self, id: &[u8]) -> StoreResult<bool>;

    /// Remove `text` and the identifier it maps to. Missing text is a no-op.
    fn remove(&self, text: &str) -> StoreResult<()>;
}

/// Data-access factory dictionaries are initialised against.
///
/// Opening the same name twice must yield the same underlying index, so
/// that restarted dictionaries see the pairs persisted before.
pub trait IndexFactory: Send + Sync {
    fn open(&self, name: &str) -> StoreResult<Arc<dyn TermIndex>>;
}
