//! Bounded LRU cache decorator for any dictionary.
//!
//! A cache keeps two independent LRU maps: value → identifier for `get_id`
//! results and identifier → value for `get_value` results. Predicate and
//! non-predicate lookups get separate pairs of maps, since the wrapped
//! dictionary may resolve them against different indexes. On a miss it asks
//! the wrapped dictionary, then lets its [`CacheStrategy`] decide whether the
//! result is stored. Hits return straight away and leave the lookup context
//! untouched.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cirrus_store::IndexFactory;
use cirrus_types::{TermKind, ValueId};
use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::CacheConfig;
use crate::context::LookupContext;
use crate::dictionary::Dictionary;
use crate::error::{DictError, DictResult};
use crate::strategy::{CacheStrategy, Cumulative, FirstLevel};

/// Snapshot of a cache decorator's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub id_hits: u64,
    pub id_misses: u64,
    pub id_evictions: u64,
    pub value_hits: u64,
    pub value_misses: u64,
    pub value_evictions: u64,
    pub id_entries: usize,
    pub value_entries: usize,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl Counters {
    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn evicted(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    fn load(&self) -> (u64, u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.evictions.load(Ordering::Relaxed),
        )
    }
}

struct Tables<V> {
    ids: Mutex<LruCache<V, ValueId>>,
    values: Mutex<LruCache<ValueId, V>>,
}

impl<V: Hash + Eq> Tables<V> {
    fn new(ids: NonZeroUsize, values: NonZeroUsize) -> Self {
        Self {
            ids: Mutex::new(LruCache::new(ids)),
            values: Mutex::new(LruCache::new(values)),
        }
    }
}

struct CacheTables<V> {
    /// Indexed by the predicate flag.
    sides: [Tables<V>; 2],
    id_counters: Counters,
    value_counters: Counters,
}

impl<V: Hash + Eq> CacheTables<V> {
    fn side(&self, predicate: bool) -> &Tables<V> {
        &self.sides[usize::from(predicate)]
    }

    fn stats(&self) -> CacheStats {
        let (id_hits, id_misses, id_evictions) = self.id_counters.load();
        let (value_hits, value_misses, value_evictions) = self.value_counters.load();
        CacheStats {
            id_hits,
            id_misses,
            id_evictions,
            value_hits,
            value_misses,
            value_evictions,
            id_entries: self.sides.iter().map(|t| t.ids.lock().len()).sum(),
            value_entries: self.sides.iter().map(|t| t.values.lock().len()).sum(),
        }
    }
}

/// Read-only view of a cache's contents and counters.
///
/// Cloned out of a [`CacheDictionary`] before it is boxed into a chain, the
/// handle stays valid for the cache's whole life.
pub struct CacheHandle<V> {
    tables: Arc<CacheTables<V>>,
}

impl<V: Hash + Eq> CacheHandle<V> {
    /// Whether `get_id(value, predicate)` would be answered from the cache.
    pub fn contains_value(&self, value: &V, predicate: bool) -> bool {
        self.tables.side(predicate).ids.lock().contains(value)
    }

    /// Whether `get_value(id, predicate)` would be answered from the cache.
    pub fn contains_id(&self, id: &[u8], predicate: bool) -> bool {
        self.tables.side(predicate).values.lock().contains(id)
    }

    pub fn stats(&self) -> CacheStats {
        self.tables.stats()
    }
}

impl<V> Clone for CacheHandle<V> {
    fn clone(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
        }
    }
}

/// Cache decorator in front of a dictionary.
pub struct CacheDictionary<V, D> {
    name: String,
    inner: D,
    strategy: Box<dyn CacheStrategy>,
    tables: Arc<CacheTables<V>>,
}

impl<V, D> CacheDictionary<V, D>
where
    V: Clone + Hash + Eq + Send + Sync,
    D: Dictionary<V>,
{
    /// Wrap `inner` with caches sized by `config`. A zero size is rejected.
    ///
    /// Each size bounds one flag's table, so a cache holds at most twice as
    /// many entries per direction.
    pub fn new(
        inner: D,
        strategy: Box<dyn CacheStrategy>,
        config: &CacheConfig,
    ) -> DictResult<Self> {
        let ids = NonZeroUsize::new(config.id_cache_size)
            .ok_or_else(|| DictError::InvalidConfig("id cache size must be positive".into()))?;
        let values = NonZeroUsize::new(config.value_cache_size)
            .ok_or_else(|| DictError::InvalidConfig("value cache size must be positive".into()))?;
        Ok(Self {
            name: format!("{}+{}", inner.name(), strategy.name()),
            inner,
            strategy,
            tables: Arc::new(CacheTables {
                sides: [Tables::new(ids, values), Tables::new(ids, values)],
                id_counters: Counters::default(),
                value_counters: Counters::default(),
            }),
        })
    }

    pub fn first_level(inner: D, config: &CacheConfig) -> DictResult<Self> {
        Self::new(inner, Box::new(FirstLevel), config)
    }

    pub fn cumulative(inner: D, config: &CacheConfig) -> DictResult<Self> {
        Self::new(inner, Box::new(Cumulative), config)
    }

    pub fn handle(&self) -> CacheHandle<V> {
        CacheHandle {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.tables.stats()
    }

    pub fn strategy(&self) -> &dyn CacheStrategy {
        self.strategy.as_ref()
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    fn store_id(&self, value: V, predicate: bool, id: ValueId) {
        let mut ids = self.tables.side(predicate).ids.lock();
        if let Some((old, _)) = ids.push(value.clone(), id) {
            if old != value {
                self.tables.id_counters.evicted();
            }
        }
    }

    fn store_value(&self, id: ValueId, predicate: bool, value: V) {
        let mut values = self.tables.side(predicate).values.lock();
        if let Some((old, _)) = values.push(id.clone(), value) {
            if old != id {
                self.tables.value_counters.evicted();
            }
        }
    }

    fn clear(&self) {
        for tables in &self.tables.sides {
            tables.ids.lock().clear();
            tables.values.lock().clear();
        }
    }
}

impl<V, D> Dictionary<V> for CacheDictionary<V, D>
where
    V: Clone + Hash + Eq + Send + Sync,
    D: Dictionary<V>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn initialise(&mut self, factory: &dyn IndexFactory) -> DictResult<()> {
        self.inner.initialise(factory)
    }

    fn close(&mut self) -> DictResult<()> {
        let stats = self.stats();
        self.clear();
        debug!(
            cache = %self.name,
            id_hits = stats.id_hits,
            id_misses = stats.id_misses,
            value_hits = stats.value_hits,
            value_misses = stats.value_misses,
            "cache closed"
        );
        self.inner.close()
    }

    fn get_id(&self, value: &V, predicate: bool, ctx: &mut LookupContext) -> DictResult<ValueId> {
        if let Some(id) = self.tables.side(predicate).ids.lock().get(value).cloned() {
            self.tables.id_counters.hit();
            return Ok(id);
        }
        self.tables.id_counters.miss();

        let id = self.inner.get_id(value, predicate, ctx)?;
        if self.strategy.admit(ctx) {
            self.store_id(value.clone(), predicate, id.clone());
        }
        Ok(id)
    }

    fn get_value(
        &self,
        id: &[u8],
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<Option<V>> {
        if let Some(value) = self.tables.side(predicate).values.lock().get(id).cloned() {
            self.tables.value_counters.hit();
            return Ok(Some(value));
        }
        self.tables.value_counters.miss();

        let value = self.inner.get_value(id, predicate, ctx)?;
        let admit = self.strategy.admit(ctx);
        if let Some(value) = &value {
            if admit {
                self.store_value(ValueId::copy_from_slice(id), predicate, value.clone());
            }
        }
        Ok(value)
    }

    fn remove_value(&self, value: &V, predicate: bool, ctx: &mut LookupContext) -> DictResult<()> {
        let tables = self.tables.side(predicate);
        let cached = tables.ids.lock().pop(value);
        let id = match cached {
            Some(id) => id,
            None => self.inner.get_id(value, predicate, ctx)?,
        };
        tables.values.lock().pop(id.as_bytes());
        self.inner.remove_value(value, predicate, ctx)
    }

    fn kind_of(&self, id: &[u8]) -> Option<TermKind> {
        self.inner.kind_of(id)
    }

    fn compose(&self, parts: &[&[u8]]) -> DictResult<ValueId> {
        self.inner.compose(parts)
    }

    fn decompose(&self, id: &[u8]) -> DictResult<Vec<ValueId>> {
        self.inner.decompose(id)
    }
}

impl<V, D> std::fmt::Debug for CacheDictionary<V, D>
where
    V: Clone + Hash + Eq + Send + Sync,
    D: Dictionary<V>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheDictionary")
            .field("name", &self.name)
            .field("strategy", &self.strategy.name())
            .field("stats", &self.stats())
            .finish()
    }
}
