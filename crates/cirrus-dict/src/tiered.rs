//! Three-tiered dictionary: resources split into namespace and local name.
//!
//! ```text
//! [TIERED][namespace id (8 bytes)][local-name id]
//! ```
//!
//! Blank nodes and literals go to the term dictionary unchanged.

use cirrus_store::IndexFactory;
use cirrus_types::{markers, split_iri, Term, TermKind, ValueId};
use tracing::{debug, warn};

use crate::codec::COUNTER_LEN;
use crate::context::LookupContext;
use crate::dictionary::Dictionary;
use crate::error::{DictError, DictResult};

/// Width of the namespace part of a tiered resource identifier.
pub const NAMESPACE_ID_LEN: usize = COUNTER_LEN;

pub struct ThreeTieredDictionary {
    name: String,
    namespaces: Box<dyn Dictionary<String>>,
    local_names: Box<dyn Dictionary<String>>,
    terms: Box<dyn Dictionary<Term>>,
}

impl ThreeTieredDictionary {
    pub fn new(
        name: impl Into<String>,
        namespaces: Box<dyn Dictionary<String>>,
        local_names: Box<dyn Dictionary<String>>,
        terms: Box<dyn Dictionary<Term>>,
    ) -> Self {
        Self {
            name: name.into(),
            namespaces,
            local_names,
            terms,
        }
    }

    fn is_tiered(id: &[u8]) -> bool {
        id.len() > NAMESPACE_ID_LEN && id[0] == markers::TIERED
    }

    fn resource_id(&self, iri: &str, predicate: bool) -> DictResult<ValueId> {
        let (namespace, local_name) = split_iri(iri);
        let ns_id = self
            .namespaces
            .get_id(&namespace.to_string(), predicate, &mut LookupContext::new())?;
        if ns_id.len() != NAMESPACE_ID_LEN {
            return Err(DictError::malformed(
                &ns_id,
                format!("namespace identifiers must be {NAMESPACE_ID_LEN} bytes"),
            ));
        }
        let local_id = self
            .local_names
            .get_id(&local_name.to_string(), predicate, &mut LookupContext::new())?;

        let mut id = Vec::with_capacity(1 + ns_id.len() + local_id.len());
        id.push(markers::TIERED);
        id.extend_from_slice(&ns_id);
        id.extend_from_slice(&local_id);
        Ok(ValueId::from(id))
    }

    fn resource_value(&self, id: &[u8], predicate: bool) -> DictResult<Option<Term>> {
        let (ns_id, local_id) = id[1..].split_at(NAMESPACE_ID_LEN);
        let namespace = self
            .namespaces
            .get_value(ns_id, predicate, &mut LookupContext::new())?;
        let local_name = self
            .local_names
            .get_value(local_id, predicate, &mut LookupContext::new())?;
        match (namespace, local_name) {
            (Some(namespace), Some(local_name)) => {
                Ok(Some(Term::resource(namespace + &local_name)))
            }
            (namespace, local_name) => {
                warn!(
                    dictionary = %self.name,
                    id = %ValueId::copy_from_slice(id),
                    namespace_found = namespace.is_some(),
                    local_name_found = local_name.is_some(),
                    "tiered resource identifier does not resolve"
                );
                Ok(None)
            }
        }
    }
}

impl Dictionary<Term> for ThreeTieredDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialise(&mut self, factory: &dyn IndexFactory) -> DictResult<()> {
        self.namespaces.initialise(factory)?;
        self.local_names.initialise(factory)?;
        self.terms.initialise(factory)?;
        debug!(dictionary = %self.name, "three-tiered dictionary initialised");
        Ok(())
    }

    fn close(&mut self) -> DictResult<()> {
        let namespaces = self.namespaces.close();
        let local_names = self.local_names.close();
        let terms = self.terms.close();
        namespaces.and(local_names).and(terms)
    }

    fn get_id(
        &self,
        value: &Term,
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<ValueId> {
        match value {
            Term::Resource(iri) => {
                let id = self.resource_id(iri, predicate)?;
                ctx.mark_fresh();
                Ok(id)
            }
            _ => self.terms.get_id(value, predicate, ctx),
        }
    }

    fn get_value(
        &self,
        id: &[u8],
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<Option<Term>> {
        if !Self::is_tiered(id) {
            return self.terms.get_value(id, predicate, ctx);
        }
        let term = self.resource_value(id, predicate)?;
        if term.is_some() {
            ctx.mark_fresh();
        }
        Ok(term)
    }

    fn remove_value(
        &self,
        value: &Term,
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<()> {
        match value {
            Term::Resource(iri) => {
                // namespace and local name may be shared with other resources
                debug!(dictionary = %self.name, iri = %iri, "resource removal skipped");
                Ok(())
            }
            _ => self.terms.remove_value(value, predicate, ctx),
        }
    }

    fn kind_of(&self, id: &[u8]) -> Option<TermKind> {
        if Self::is_tiered(id) {
            return Some(TermKind::Resource);
        }
        self.terms.kind_of(id)
    }
}

impl std::fmt::Debug for ThreeTieredDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreeTieredDictionary")
            .field("name", &self.name)
            .field("namespaces", &self.namespaces.name())
            .field("local_names", &self.local_names.name())
            .field("terms", &self.terms.name())
            .finish()
    }
}
