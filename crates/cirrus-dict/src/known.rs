//! Fast path for resources from well-known vocabularies.
//!
//! Resources whose namespace is in the configured set get a short hash
//! identifier from a dedicated index:
//!
//! ```text
//! [KNOWN][RESOURCE][12-byte hash]      14 bytes
//! ```
//!
//! Everything else is forwarded untouched to the wrapped dictionary.

use std::collections::HashSet;
use std::sync::Arc;

use cirrus_hash::{TermHasher, Xxh3Hasher};
use cirrus_store::{IndexFactory, TermIndex};
use cirrus_types::{markers, Term, TermKind, ValueId};
use tracing::{debug, warn};

use crate::allocator::HashAllocator;
use crate::context::LookupContext;
use crate::dictionary::Dictionary;
use crate::error::{DictError, DictResult};

/// Length of a known-term identifier.
pub const KNOWN_ID_LEN: usize = 14;

const KNOWN_HASH_LEN: usize = KNOWN_ID_LEN - 2;

/// Vocabularies recognised when no namespace list is configured.
pub const DEFAULT_NAMESPACES: &[&str] = &[
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
    "http://www.w3.org/2000/01/rdf-schema#",
    "http://www.w3.org/2002/07/owl#",
    "http://www.w3.org/2001/XMLSchema#",
    "http://xmlns.com/foaf/0.1/",
    "http://purl.org/dc/elements/1.1/",
    "http://purl.org/dc/terms/",
    "http://www.w3.org/2004/02/skos/core#",
    "http://schema.org/",
];

pub struct KnownTermsDictionary<D> {
    name: String,
    namespaces: HashSet<String>,
    hasher: Arc<dyn TermHasher>,
    index: Option<Arc<dyn TermIndex>>,
    allocator: HashAllocator,
    inner: D,
}

impl<D: Dictionary<Term>> KnownTermsDictionary<D> {
    pub fn new<I, S>(name: impl Into<String>, namespaces: I, inner: D) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            namespaces: namespaces.into_iter().map(Into::into).collect(),
            hasher: Arc::new(Xxh3Hasher::KNOWN_TERMS),
            index: None,
            allocator: HashAllocator::new(),
            inner,
        }
    }

    /// Known-terms dictionary over [`DEFAULT_NAMESPACES`].
    pub fn with_default_namespaces(name: impl Into<String>, inner: D) -> Self {
        Self::new(name, DEFAULT_NAMESPACES.iter().copied(), inner)
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn TermHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Whether `term` is a resource from a known namespace.
    pub fn is_known(&self, term: &Term) -> bool {
        term.namespace()
            .is_some_and(|ns| self.namespaces.contains(ns))
    }

    fn is_local(id: &[u8]) -> bool {
        id.len() == KNOWN_ID_LEN && id[0] == markers::KNOWN
    }

    fn index(&self) -> DictResult<&dyn TermIndex> {
        self.index
            .as_deref()
            .ok_or_else(|| DictError::NotInitialised(self.name.clone()))
    }

    fn candidate(&self, iri: &str) -> Vec<u8> {
        let hash = self.hasher.hash128(iri.as_bytes());
        let mut id = Vec::with_capacity(KNOWN_ID_LEN);
        id.push(markers::KNOWN);
        id.push(markers::RESOURCE);
        id.extend_from_slice(&hash[..KNOWN_HASH_LEN]);
        id
    }
}

impl<D: Dictionary<Term>> Dictionary<Term> for KnownTermsDictionary<D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialise(&mut self, factory: &dyn IndexFactory) -> DictResult<()> {
        self.index = Some(factory.open(&self.name)?);
        debug!(
            dictionary = %self.name,
            namespaces = self.namespaces.len(),
            "known-terms dictionary initialised"
        );
        self.inner.initialise(factory)
    }

    fn close(&mut self) -> DictResult<()> {
        self.index = None;
        self.inner.close()
    }

    fn get_id(
        &self,
        value: &Term,
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<ValueId> {
        let Some(iri) = value.iri().filter(|_| self.is_known(value)) else {
            return self.inner.get_id(value, predicate, ctx);
        };
        let id = self
            .allocator
            .lookup_or_allocate(&self.name, self.index()?, iri, || self.candidate(iri))?;
        ctx.mark_fresh();
        Ok(id)
    }

    fn get_value(
        &self,
        id: &[u8],
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<Option<Term>> {
        if !Self::is_local(id) {
            return self.inner.get_value(id, predicate, ctx);
        }
        match self.index()?.get_quick(id)? {
            Some(iri) => {
                ctx.mark_fresh();
                Ok(Some(Term::resource(iri)))
            }
            None => {
                warn!(
                    dictionary = %self.name,
                    id = %ValueId::copy_from_slice(id),
                    "no known term stored for identifier"
                );
                Ok(None)
            }
        }
    }

    fn remove_value(
        &self,
        value: &Term,
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<()> {
        match value.iri().filter(|_| self.is_known(value)) {
            Some(iri) => Ok(self.index()?.remove(iri)?),
            None => self.inner.remove_value(value, predicate, ctx),
        }
    }

    fn kind_of(&self, id: &[u8]) -> Option<TermKind> {
        if Self::is_local(id) {
            return TermKind::from_marker(id[1]);
        }
        self.inner.kind_of(id)
    }
}

impl<D: Dictionary<Term>> std::fmt::Debug for KnownTermsDictionary<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnownTermsDictionary")
            .field("name", &self.name)
            .field("namespaces", &self.namespaces.len())
            .field("inner", &self.inner.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCalls, MockDictionary};
    use cirrus_store::InMemoryIndexFactory;
    use cirrus_types::Literal;

    const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";

    type Fixture = (
        KnownTermsDictionary<MockDictionary<Term>>,
        Arc<MockCalls>,
        InMemoryIndexFactory,
    );

    fn known() -> Fixture {
        let mock = MockDictionary::new("rest");
        let calls = mock.calls();
        let factory = InMemoryIndexFactory::new();
        let mut dict = KnownTermsDictionary::with_default_namespaces("known", mock);
        dict.initialise(&factory).unwrap();
        (dict, calls, factory)
    }

    #[test]
    fn known_namespaces_bypass_the_decoratee() {
        let (dict, calls, _factory) = known();
        for iri in [RDF_TYPE, FOAF_NAME, "http://schema.org/Person"] {
            let term = Term::resource(iri);
            for predicate in [false, true] {
                let mut ctx = LookupContext::new();
                let id = dict.get_id(&term, predicate, &mut ctx).unwrap();
                assert!(ctx.is_fresh());
                assert_eq!(id.len(), KNOWN_ID_LEN);
                assert_eq!(&id[..2], &[markers::KNOWN, markers::RESOURCE]);
                assert!(dict.is_resource(&id));
                assert_eq!(
                    dict.get_value(&id, predicate, &mut LookupContext::new()).unwrap(),
                    Some(term.clone())
                );
            }
        }
        assert_eq!(calls.get_id(), 0);
        assert_eq!(calls.get_value(), 0);
    }

    #[test]
    fn other_terms_always_reach_the_decoratee() {
        let (dict, calls, _factory) = known();
        let terms = [
            Term::resource("http://example.org/ns#thing"),
            // namespace must match exactly, not by prefix
            Term::resource("http://xmlns.com/foaf/0.1/extra/name"),
            Term::bnode("b1"),
            Term::literal(Literal::typed("1", "http://www.w3.org/2001/XMLSchema#int")),
        ];
        for (n, term) in terms.iter().enumerate() {
            let id = dict.get_id(term, false, &mut LookupContext::new()).unwrap();
            assert_eq!(calls.get_id(), n + 1);
            assert_eq!(
                dict.get_value(&id, false, &mut LookupContext::new()).unwrap().as_ref(),
                Some(term)
            );
            assert_eq!(calls.get_value(), n + 1);
        }
    }

    #[test]
    fn local_path_requires_marker_and_length() {
        let (dict, calls, _factory) = known();
        let mut near_miss = vec![markers::KNOWN, markers::RESOURCE];
        near_miss.extend_from_slice(&[0; KNOWN_HASH_LEN + 1]);
        dict.get_value(&near_miss, false, &mut LookupContext::new())
            .unwrap();
        assert_eq!(calls.get_value(), 1);
    }

    #[test]
    fn unknown_local_id_is_none() {
        let (dict, calls, _factory) = known();
        let mut id = vec![markers::KNOWN, markers::RESOURCE];
        id.extend_from_slice(&[0; KNOWN_HASH_LEN]);
        assert_eq!(dict.get_value(&id, false, &mut LookupContext::new()).unwrap(), None);
        assert_eq!(calls.get_value(), 0);
    }

    #[test]
    fn ids_are_stable_and_stored_in_own_index() {
        let (dict, _calls, factory) = known();
        let term = Term::resource(RDF_TYPE);
        let a = dict.get_id(&term, false, &mut LookupContext::new()).unwrap();
        let b = dict.get_id(&term, true, &mut LookupContext::new()).unwrap();
        assert_eq!(a, b);
        assert_eq!(factory.index("known").unwrap().len(), 1);
    }

    #[test]
    fn remove_local_and_forwarded() {
        let (dict, calls, _factory) = known();
        let term = Term::resource(RDF_TYPE);
        let id = dict.get_id(&term, false, &mut LookupContext::new()).unwrap();
        dict.remove_value(&term, false, &mut LookupContext::new()).unwrap();
        assert_eq!(dict.get_value(&id, false, &mut LookupContext::new()).unwrap(), None);
        assert_eq!(calls.remove_value(), 0);

        dict.remove_value(&Term::bnode("x"), false, &mut LookupContext::new())
            .unwrap();
        assert_eq!(calls.remove_value(), 1);
    }

    #[test]
    fn custom_namespaces() {
        let mut dict = KnownTermsDictionary::new(
            "known",
            ["http://example.org/vocab#"],
            MockDictionary::<Term>::new("rest"),
        );
        dict.initialise(&InMemoryIndexFactory::new()).unwrap();
        assert!(dict.is_known(&Term::resource("http://example.org/vocab#p")));
        assert!(!dict.is_known(&Term::resource(RDF_TYPE)));
        assert!(!dict.is_known(&Term::literal(Literal::plain("http://example.org/vocab#p"))));
    }

    #[test]
    fn lifecycle_forwards() {
        let (mut dict, calls, _factory) = known();
        assert_eq!(calls.initialise(), 1);
        dict.close().unwrap();
        assert_eq!(calls.close(), 1);
        assert!(matches!(
            dict.get_id(&Term::resource(RDF_TYPE), false, &mut LookupContext::new()),
            Err(DictError::NotInitialised(_))
        ));
    }
}
