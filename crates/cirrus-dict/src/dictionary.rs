//! The [`Dictionary`] trait every dictionary implementation honours.

use cirrus_store::IndexFactory;
use cirrus_types::{TermKind, ValueId};

use crate::codec;
use crate::context::LookupContext;
use crate::error::DictResult;

/// Bidirectional mapping between values of type `V` and identifiers.
///
/// `V` is [`cirrus_types::Term`] for term dictionaries and `String` for the
/// namespace/local-name dictionaries of the three-tiered layout.
///
/// Implementations must satisfy these invariants:
/// - `get_value(get_id(v)) == Some(v)` and `get_id(get_value(id)) == id`
///   for as long as the backing entry lives.
/// - Lookups are safe to call concurrently (`&self`); lifecycle changes take
///   `&mut self` and therefore never race with lookups.
/// - Backing index failures are returned as [`crate::DictError::DataAccess`]
///   and never swallowed.
/// - A value produced by this dictionary itself (rather than by a dictionary
///   it wraps) is reported via [`LookupContext::mark_fresh`].
///
/// The `predicate` flag says whether the value sits in predicate position.
/// Implementations may route predicates to a separate index or ignore it.
pub trait Dictionary<V>: Send + Sync {
    /// Name used for index names and log fields.
    fn name(&self) -> &str;

    /// Wire the dictionary to its backing indexes or delegates.
    fn initialise(&mut self, factory: &dyn IndexFactory) -> DictResult<()>;

    /// Release caches and backing resources.
    fn close(&mut self) -> DictResult<()>;

    /// Identifier for `value`, allocating one if necessary.
    fn get_id(&self, value: &V, predicate: bool, ctx: &mut LookupContext) -> DictResult<ValueId>;

    /// Value for `id`, or `Ok(None)` if nothing is stored under it.
    fn get_value(&self, id: &[u8], predicate: bool, ctx: &mut LookupContext)
        -> DictResult<Option<V>>;

    /// Forget `value`. Removing an unknown value is a no-op.
    fn remove_value(&self, value: &V, predicate: bool, ctx: &mut LookupContext) -> DictResult<()>;

    /// Kind of term `id` stands for, judged from its bytes alone.
    fn kind_of(&self, _id: &[u8]) -> Option<TermKind> {
        None
    }

    fn is_resource(&self, id: &[u8]) -> bool {
        self.kind_of(id) == Some(TermKind::Resource)
    }

    fn is_bnode(&self, id: &[u8]) -> bool {
        self.kind_of(id) == Some(TermKind::BNode)
    }

    fn is_literal(&self, id: &[u8]) -> bool {
        self.kind_of(id) == Some(TermKind::Literal)
    }

    /// Pack sub-identifiers into one composite identifier.
    fn compose(&self, parts: &[&[u8]]) -> DictResult<ValueId> {
        Ok(codec::compose(parts)?)
    }

    /// Unpack a composite identifier.
    fn decompose(&self, id: &[u8]) -> DictResult<Vec<ValueId>> {
        Ok(codec::decompose(id)?)
    }
}

impl<V, D> Dictionary<V> for Box<D>
where
    D: Dictionary<V> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn initialise(&mut self, factory: &dyn IndexFactory) -> DictResult<()> {
        (**self).initialise(factory)
    }

    fn close(&mut self) -> DictResult<()> {
        (**self).close()
    }

    fn get_id(&self, value: &V, predicate: bool, ctx: &mut LookupContext) -> DictResult<ValueId> {
        (**self).get_id(value, predicate, ctx)
    }

    fn get_value(
        &self,
        id: &[u8],
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<Option<V>> {
        (**self).get_value(id, predicate, ctx)
    }

    fn remove_value(&self, value: &V, predicate: bool, ctx: &mut LookupContext) -> DictResult<()> {
        (**self).remove_value(value, predicate, ctx)
    }

    fn kind_of(&self, id: &[u8]) -> Option<TermKind> {
        (**self).kind_of(id)
    }

    fn compose(&self, parts: &[&[u8]]) -> DictResult<ValueId> {
        (**self).compose(parts)
    }

    fn decompose(&self, id: &[u8]) -> DictResult<Vec<ValueId>> {
        (**self).decompose(id)
    }
}
