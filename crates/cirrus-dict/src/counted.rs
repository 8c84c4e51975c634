//! Lookup-counting wrapper: the outermost layer of every dictionary chain.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use cirrus_store::IndexFactory;
use cirrus_types::{TermKind, ValueId};
use tracing::debug;

use crate::context::LookupContext;
use crate::dictionary::Dictionary;
use crate::error::{DictError, DictResult};

/// Snapshot of a [`CountedDictionary`]'s lookup counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookupStats {
    pub id_lookups: u64,
    pub value_lookups: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Open,
    Closed,
}

/// Wraps a dictionary with null handling, lookup counters and a lifecycle
/// state machine.
///
/// Absent inputs short-circuit to `Ok(None)` before reaching the wrapped
/// dictionary and are not counted. Each top-level call gets its own
/// [`LookupContext`].
pub struct CountedDictionary<V, D> {
    inner: D,
    state: Lifecycle,
    id_lookups: AtomicU64,
    value_lookups: AtomicU64,
    _value: PhantomData<fn() -> V>,
}

impl<V, D: Dictionary<V>> CountedDictionary<V, D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            state: Lifecycle::Created,
            id_lookups: AtomicU64::new(0),
            value_lookups: AtomicU64::new(0),
            _value: PhantomData,
        }
    }

    /// Identifier for `value`; `None` in, `None` out.
    pub fn get_id(&self, value: Option<&V>, predicate: bool) -> DictResult<Option<ValueId>> {
        let Some(value) = value else {
            return Ok(None);
        };
        let mut ctx = LookupContext::new();
        Dictionary::get_id(self, value, predicate, &mut ctx).map(Some)
    }

    /// Value stored under `id`; `None` in, `None` out.
    pub fn get_value(&self, id: Option<&[u8]>, predicate: bool) -> DictResult<Option<V>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let mut ctx = LookupContext::new();
        Dictionary::get_value(self, id, predicate, &mut ctx)
    }

    /// Forget `value`. `None` is a no-op.
    pub fn remove_value(&self, value: Option<&V>, predicate: bool) -> DictResult<()> {
        let Some(value) = value else {
            return Ok(());
        };
        let mut ctx = LookupContext::new();
        Dictionary::remove_value(self, value, predicate, &mut ctx)
    }

    /// Pack identifiers into a composite one. Every part must be present.
    pub fn compose_ids(&self, parts: &[Option<&ValueId>]) -> DictResult<ValueId> {
        let mut present = Vec::with_capacity(parts.len());
        for (position, part) in parts.iter().enumerate() {
            match part {
                Some(id) => present.push(id.as_bytes()),
                None => return Err(DictError::NullIdentifier(position)),
            }
        }
        self.inner.compose(&present)
    }

    pub fn stats(&self) -> LookupStats {
        LookupStats {
            id_lookups: self.id_lookups.load(Ordering::Relaxed),
            value_lookups: self.value_lookups.load(Ordering::Relaxed),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == Lifecycle::Open
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<V, D: Dictionary<V>> Dictionary<V> for CountedDictionary<V, D> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Initialises the wrapped dictionary once. Repeated calls on a live
    /// dictionary are no-ops; a closed dictionary cannot be reopened.
    fn initialise(&mut self, factory: &dyn IndexFactory) -> DictResult<()> {
        match self.state {
            Lifecycle::Open => Ok(()),
            Lifecycle::Closed => Err(DictError::Closed(self.inner.name().to_string())),
            Lifecycle::Created => {
                self.inner.initialise(factory)?;
                self.state = Lifecycle::Open;
                debug!(dictionary = self.inner.name(), "dictionary initialised");
                Ok(())
            }
        }
    }

    fn close(&mut self) -> DictResult<()> {
        if self.state == Lifecycle::Closed {
            return Ok(());
        }
        let stats = self.stats();
        self.state = Lifecycle::Closed;
        self.inner.close()?;
        debug!(
            dictionary = self.inner.name(),
            id_lookups = stats.id_lookups,
            value_lookups = stats.value_lookups,
            "dictionary closed"
        );
        Ok(())
    }

    fn get_id(&self, value: &V, predicate: bool, ctx: &mut LookupContext) -> DictResult<ValueId> {
        self.id_lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.get_id(value, predicate, ctx)
    }

    fn get_value(
        &self,
        id: &[u8],
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<Option<V>> {
        self.value_lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.get_value(id, predicate, ctx)
    }

    fn remove_value(&self, value: &V, predicate: bool, ctx: &mut LookupContext) -> DictResult<()> {
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

impl<V, D: Dictionary<V>> std::fmt::Debug for CountedDictionary<V, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountedDictionary")
            .field("name", &self.inner.name())
            .field("state", &self.state)
            .field("stats", &self.stats())
            .finish()
    }
}
