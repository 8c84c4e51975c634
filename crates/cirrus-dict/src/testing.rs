//! Test doubles shared by the dictionary unit tests.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use cirrus_store::{IndexFactory, StoreError, StoreResult, TermIndex};
use cirrus_types::ValueId;
use parking_lot::Mutex;

use crate::context::LookupContext;
use crate::dictionary::Dictionary;
use crate::error::DictResult;

/// Marker byte of identifiers minted by [`MockDictionary`].
pub(crate) const MOCK_MARKER: u8 = 0x7f;

/// Invocation counters of a [`MockDictionary`], shared so tests can keep a
/// handle after the mock is boxed into a chain.
#[derive(Debug, Default)]
pub(crate) struct MockCalls {
    get_id: AtomicUsize,
    get_value: AtomicUsize,
    remove_value: AtomicUsize,
    initialise: AtomicUsize,
    close: AtomicUsize,
}

impl MockCalls {
    pub(crate) fn get_id(&self) -> usize {
        self.get_id.load(Ordering::SeqCst)
    }

    pub(crate) fn get_value(&self) -> usize {
        self.get_value.load(Ordering::SeqCst)
    }

    pub(crate) fn remove_value(&self) -> usize {
        self.remove_value.load(Ordering::SeqCst)
    }

    pub(crate) fn initialise(&self) -> usize {
        self.initialise.load(Ordering::SeqCst)
    }

    pub(crate) fn close(&self) -> usize {
        self.close.load(Ordering::SeqCst)
    }

    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

struct Pairs<V> {
    by_value: HashMap<V, ValueId>,
    by_id: HashMap<ValueId, V>,
}

/// Recording dictionary double.
///
/// Mints `[MOCK_MARKER][u64 counter]` identifiers unless a value was
/// scripted with [`MockDictionary::script`], and marks every answer fresh.
pub(crate) struct MockDictionary<V> {
    name: String,
    pairs: Mutex<Pairs<V>>,
    next: AtomicU64,
    calls: Arc<MockCalls>,
    failing: bool,
}

impl<V: Clone + Eq + Hash> MockDictionary<V> {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pairs: Mutex::new(Pairs {
                by_value: HashMap::new(),
                by_id: HashMap::new(),
            }),
            next: AtomicU64::new(1),
            calls: Arc::new(MockCalls::default()),
            failing: false,
        }
    }

    /// A mock whose every lookup fails with a data-access error.
    pub(crate) fn failing(name: &str) -> Self {
        Self {
            failing: true,
            ..Self::new(name)
        }
    }

    /// Answer `get_id(value)` with `id`.
    pub(crate) fn script(self, value: V, id: ValueId) -> Self {
        {
            let mut pairs = self.pairs.lock();
            pairs.by_id.insert(id.clone(), value.clone());
            pairs.by_value.insert(value, id);
        }
        self
    }

    pub(crate) fn calls(&self) -> Arc<MockCalls> {
        Arc::clone(&self.calls)
    }

    fn check(&self) -> DictResult<()> {
        if self.failing {
            return Err(StoreError::Backend {
                index: self.name.clone(),
                reason: "scripted failure".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl<V> Dictionary<V> for MockDictionary<V>
where
    V: Clone + Eq + Hash + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn initialise(&mut self, _factory: &dyn IndexFactory) -> DictResult<()> {
        MockCalls::bump(&self.calls.initialise);
        Ok(())
    }

    fn close(&mut self) -> DictResult<()> {
        MockCalls::bump(&self.calls.close);
        Ok(())
    }

    fn get_id(&self, value: &V, _predicate: bool, ctx: &mut LookupContext) -> DictResult<ValueId> {
        MockCalls::bump(&self.calls.get_id);
        self.check()?;
        let mut pairs = self.pairs.lock();
        let id = match pairs.by_value.get(value) {
            Some(id) => id.clone(),
            None => {
                let mut bytes = vec![MOCK_MARKER];
                bytes.extend_from_slice(&self.next.fetch_add(1, Ordering::SeqCst).to_be_bytes());
                let id = ValueId::from(bytes);
                pairs.by_value.insert(value.clone(), id.clone());
                pairs.by_id.insert(id.clone(), value.clone());
                id
            }
        };
        ctx.mark_fresh();
        Ok(id)
    }

    fn get_value(
        &self,
        id: &[u8],
        _predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<Option<V>> {
        MockCalls::bump(&self.calls.get_value);
        self.check()?;
        let value = self.pairs.lock().by_id.get(id).cloned();
        if value.is_some() {
            ctx.mark_fresh();
        }
        Ok(value)
    }

    fn remove_value(
        &self,
        value: &V,
        _predicate: bool,
        _ctx: &mut LookupContext,
    ) -> DictResult<()> {
        MockCalls::bump(&self.calls.remove_value);
        self.check()?;
        let mut pairs = self.pairs.lock();
        if let Some(id) = pairs.by_value.remove(value) {
            pairs.by_id.remove(&id);
        }
        Ok(())
    }
}

/// Index whose every operation fails.
pub(crate) struct FailingIndex;

impl FailingIndex {
    fn fail<T>() -> StoreResult<T> {
        Err(StoreError::Backend {
            index: "failing".into(),
            reason: "backend unavailable".into(),
        })
    }
}

impl TermIndex for FailingIndex {
    fn get(&self, _text: &str) -> StoreResult<Option<ValueId>> {
        Self::fail()
    }

    fn get_quick(&self, _id: &[u8]) -> StoreResult<Option<String>> {
        Self::fail()
    }

    fn put_quick(&self, _text: &str, _id: &ValueId) -> StoreResult<()> {
        Self::fail()
    }

    fn contains(&self, _id: &[u8]) -> StoreResult<bool> {
        Self::fail()
    }

    fn remove(&self, _text: &str) -> StoreResult<()> {
        Self::fail()
    }
}

/// Factory handing out [`FailingIndex`]es.
pub(crate) struct FailingFactory;

impl IndexFactory for FailingFactory {
    fn open(&self, _name: &str) -> StoreResult<Arc<dyn TermIndex>> {
        Ok(Arc::new(FailingIndex))
    }
}
