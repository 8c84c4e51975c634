use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use cirrus_types::ValueId;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{IndexFactory, TermIndex};

#[derive(Default)]
struct Maps {
    by_text: HashMap<String, ValueId>,
    by_id: HashMap<ValueId, String>,
}

/// In-memory, HashMap-based term index.
///
/// Intended for tests and embedding. Both directions live behind one
/// `RwLock` so a pair is always visible in both or neither.
pub struct InMemoryTermIndex {
    name: String,
    maps: RwLock<Maps>,
}

impl InMemoryTermIndex {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            maps: RwLock::new(Maps::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.maps.read().map(|m| m.by_text.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every pair.
    pub fn clear(&self) -> StoreResult<()> {
        let mut maps = self.write()?;
        maps.by_text.clear();
        maps.by_id.clear();
        Ok(())
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Maps>> {
        self.maps
            .read()
            .map_err(|_| StoreError::Poisoned(self.name.clone()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Maps>> {
        self.maps
            .write()
            .map_err(|_| StoreError::Poisoned(self.name.clone()))
    }
}

impl TermIndex for InMemoryTermIndex {
    fn get(&self, text: &str) -> StoreResult<Option<ValueId>> {
        Ok(self.read()?.by_text.get(text).cloned())
    }

    fn get_quick(&self, id: &[u8]) -> StoreResult<Option<String>> {
        Ok(self.read()?.by_id.get(id).cloned())
    }

    fn put_quick(&self, text: &str, id: &ValueId) -> StoreResult<()> {
        let mut maps = self.write()?;
        if let Some(old_id) = maps.by_text.insert(text.to_string(), id.clone()) {
            if old_id != *id {
                maps.by_id.remove(&old_id);
            }
        }
        if let Some(old_text) = maps.by_id.insert(id.clone(), text.to_string()) {
            if old_text != text {
                // The identifier was taken over; the old text no longer resolves.
                maps.by_text.remove(&old_text);
            }
        }
        Ok(())
    }

    fn contains(&self, id: &[u8]) -> StoreResult<bool> {
        Ok(self.read()?.by_id.contains_key(id))
    }

    fn remove(&self, text: &str) -> StoreResult<()> {
        let mut maps = self.write()?;
        if let Some(id) = maps.by_text.remove(text) {
            maps.by_id.remove(&id);
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryTermIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTermIndex")
            .field("name", &self.name)
            .field("pair_count", &self.len())
            .finish()
    }
}

/// Factory handing out shared [`InMemoryTermIndex`] instances by name.
#[derive(Default)]
pub struct InMemoryIndexFactory {
    indexes: RwLock<HashMap<String, Arc<InMemoryTermIndex>>>,
    closed: AtomicBool,
}

impl InMemoryIndexFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The concrete index registered under `name`, if it was opened.
    pub fn index(&self, name: &str) -> Option<Arc<InMemoryTermIndex>> {
        self.indexes.read().ok()?.get(name).cloned()
    }

    /// Sorted names of every index opened so far.
    pub fn index_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .indexes
            .read()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Refuse further `open` calls. Already handed-out indexes stay usable.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

impl IndexFactory for InMemoryIndexFactory {
    fn open(&self, name: &str) -> StoreResult<Arc<dyn TermIndex>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed(name.to_string()));
        }
        let mut indexes = self
            .indexes
            .write()
            .map_err(|_| StoreError::Poisoned(name.to_string()))?;
        let index = indexes.entry(name.to_string()).or_insert_with(|| {
            debug!(index = name, "opened in-memory term index");
            Arc::new(InMemoryTermIndex::new(name))
        });
        Ok(Arc::clone(index) as Arc<dyn TermIndex>)
    }
}

impl std::fmt::Debug for InMemoryIndexFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryIndexFactory")
            .field("indexes", &self.index_names())
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}
