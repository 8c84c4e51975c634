//! Hash-based term dictionary persisted in the backing index.
//!
//! Identifier layout:
//!
//! ```text
//! [kind marker][16-byte xxh3-128 hash of the N-Triples form]
//! ```
//!
//! Subject/object terms and predicate terms live in separate indexes named
//! `<name>` and `<name>_predicates`.

use std::sync::Arc;

use cirrus_hash::{TermHasher, Xxh3Hasher, HASH_LEN};
use cirrus_store::{IndexFactory, TermIndex};
use cirrus_types::{Term, TermKind, ValueId};
use tracing::{debug, warn};

use crate::allocator::HashAllocator;
use crate::context::LookupContext;
use crate::dictionary::Dictionary;
use crate::error::{DictError, DictResult};

/// Length of every identifier this dictionary allocates.
pub const PERSISTENT_ID_LEN: usize = 1 + HASH_LEN;

/// Suffix of the predicate index name.
pub const PREDICATE_INDEX_SUFFIX: &str = "_predicates";

struct Indexes {
    terms: Arc<dyn TermIndex>,
    predicates: Arc<dyn TermIndex>,
}

/// Dictionary allocating hash identifiers with bounded linear probing.
pub struct PersistentDictionary {
    name: String,
    hasher: Arc<dyn TermHasher>,
    indexes: Option<Indexes>,
    allocator: HashAllocator,
}

impl PersistentDictionary {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_hasher(name, Arc::new(Xxh3Hasher::TERMS))
    }

    pub fn with_hasher(name: impl Into<String>, hasher: Arc<dyn TermHasher>) -> Self {
        Self {
            name: name.into(),
            hasher,
            indexes: None,
            allocator: HashAllocator::new(),
        }
    }

    fn index(&self, predicate: bool) -> DictResult<&dyn TermIndex> {
        let indexes = self
            .indexes
            .as_ref()
            .ok_or_else(|| DictError::NotInitialised(self.name.clone()))?;
        Ok(if predicate {
            indexes.predicates.as_ref()
        } else {
            indexes.terms.as_ref()
        })
    }

    fn candidate(&self, kind: TermKind, text: &str) -> Vec<u8> {
        let mut id = Vec::with_capacity(PERSISTENT_ID_LEN);
        id.push(kind.marker());
        id.extend_from_slice(&self.hasher.hash128(text.as_bytes()));
        id
    }
}

impl Dictionary<Term> for PersistentDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialise(&mut self, factory: &dyn IndexFactory) -> DictResult<()> {
        let terms = factory.open(&self.name)?;
        let predicates = factory.open(&format!("{}{PREDICATE_INDEX_SUFFIX}", self.name))?;
        self.indexes = Some(Indexes { terms, predicates });
        debug!(dictionary = %self.name, "persistent dictionary initialised");
        Ok(())
    }

    fn close(&mut self) -> DictResult<()> {
        self.indexes = None;
        Ok(())
    }

    fn get_id(
        &self,
        value: &Term,
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<ValueId> {
        let index = self.index(predicate)?;
        let text = value.to_ntriples();
        let id = self
            .allocator
            .lookup_or_allocate(&self.name, index, &text, || {
                self.candidate(value.kind(), &text)
            })?;
        ctx.mark_fresh();
        Ok(id)
    }

    fn get_value(
        &self,
        id: &[u8],
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<Option<Term>> {
        let kind = id
            .first()
            .and_then(|&marker| TermKind::from_marker(marker))
            .ok_or_else(|| DictError::malformed(id, "no term kind marker"))?;

        let text = match self.index(predicate)?.get_quick(id)? {
            Some(text) if !text.is_empty() => text,
            _ => {
                warn!(
                    dictionary = %self.name,
                    id = %ValueId::copy_from_slice(id),
                    predicate,
                    "no term stored for identifier"
                );
                return Ok(None);
            }
        };

        let term = Term::parse_as(kind, &text)?;
        ctx.mark_fresh();
        Ok(Some(term))
    }

    fn remove_value(
        &self,
        value: &Term,
        predicate: bool,
        _ctx: &mut LookupContext,
    ) -> DictResult<()> {
        self.index(predicate)?.remove(&value.to_ntriples())?;
        Ok(())
    }

    fn kind_of(&self, id: &[u8]) -> Option<TermKind> {
        if id.len() != PERSISTENT_ID_LEN {
            return None;
        }
        TermKind::from_marker(id[0])
    }
}

impl std::fmt::Debug for PersistentDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentDictionary")
            .field("name", &self.name)
            .field("initialised", &self.indexes.is_some())
            .finish()
    }
}
