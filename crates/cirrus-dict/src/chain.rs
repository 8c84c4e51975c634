//! Assembly of the standard dictionary stacks from a [`DictionaryConfig`].

use std::sync::Arc;

use cirrus_hash::{TermHasher, Xxh3Hasher};
use cirrus_types::{IdSequence, Term};
use tracing::info;

use crate::cache::CacheDictionary;
use crate::config::DictionaryConfig;
use crate::counted::CountedDictionary;
use crate::dictionary::Dictionary;
use crate::error::DictResult;
use crate::known::KnownTermsDictionary;
use crate::persistent::PersistentDictionary;
use crate::sequence_string::SequenceStringDictionary;
use crate::tiered::ThreeTieredDictionary;
use crate::transient::TransientDictionary;

/// A fully assembled term dictionary chain.
pub type TermDictionary = CountedDictionary<Term, Box<dyn Dictionary<Term>>>;

/// Builds dictionary chains.
///
/// Index names derive from `config.name`:
///
/// | Index | Used by |
/// |---|---|
/// | `<name>`, `<name>_predicates` | persistent dictionary |
/// | `<name>_known` | known-terms dictionary |
/// | `<name>_namespaces`, `<name>_local_names` | three-tiered string tiers |
pub struct ChainBuilder {
    config: DictionaryConfig,
    hasher: Arc<dyn TermHasher>,
    sequence: Option<Arc<IdSequence>>,
}

impl ChainBuilder {
    pub fn new(config: DictionaryConfig) -> Self {
        Self {
            config,
            hasher: Arc::new(Xxh3Hasher::TERMS),
            sequence: None,
        }
    }

    /// Hash function of the persistent dictionary.
    pub fn with_hasher(mut self, hasher: Arc<dyn TermHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Sequence for the three-tiered string tiers. Defaults to a fresh
    /// sequence seeded from `config.node_id`.
    pub fn with_sequence(mut self, sequence: Arc<IdSequence>) -> Self {
        self.sequence = Some(sequence);
        self
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    /// `counted → cache[first-level] → known-terms → transient →
    /// cache[cumulative] → persistent`, without the known-terms layer when
    /// it is disabled.
    pub fn build(self) -> DictResult<TermDictionary> {
        self.config.validate()?;
        let name = &self.config.name;

        let transient = self.inline_over_persistent()?;
        let middle: Box<dyn Dictionary<Term>> = if self.config.known_terms.enabled {
            Box::new(KnownTermsDictionary::new(
                format!("{name}_known"),
                self.config.known_terms.namespaces.iter().cloned(),
                transient,
            ))
        } else {
            Box::new(transient)
        };
        let outer: Box<dyn Dictionary<Term>> =
            Box::new(CacheDictionary::first_level(middle, &self.config.outer_cache)?);

        info!(
            dictionary = %name,
            known_terms = self.config.known_terms.enabled,
            literal_threshold = self.config.transient.literal_threshold,
            "built term dictionary chain"
        );
        Ok(CountedDictionary::new(outer))
    }

    /// `counted → cache[first-level] → three-tiered(cache → namespaces,
    /// cache → local names, transient → cache[cumulative] → persistent)`.
    pub fn build_tiered(self) -> DictResult<TermDictionary> {
        self.config.validate()?;
        let name = &self.config.name;
        let sequence = self
            .sequence
            .clone()
            .unwrap_or_else(|| Arc::new(IdSequence::new(self.config.node_id)));

        let namespaces = CacheDictionary::cumulative(
            SequenceStringDictionary::new(format!("{name}_namespaces"), Arc::clone(&sequence)),
            &self.config.string_cache,
        )?;
        let local_names = CacheDictionary::cumulative(
            SequenceStringDictionary::new(format!("{name}_local_names"), sequence),
            &self.config.string_cache,
        )?;
        let tiered = ThreeTieredDictionary::new(
            format!("{name}_tiered"),
            Box::new(namespaces),
            Box::new(local_names),
            Box::new(self.inline_over_persistent()?),
        );
        let outer: Box<dyn Dictionary<Term>> =
            Box::new(CacheDictionary::first_level(tiered, &self.config.outer_cache)?);

        info!(
            dictionary = %name,
            node_id = self.config.node_id,
            "built three-tiered term dictionary chain"
        );
        Ok(CountedDictionary::new(outer))
    }

    fn inline_over_persistent(&self) -> DictResult<TransientDictionary> {
        let name = &self.config.name;
        let persistent = PersistentDictionary::with_hasher(name.clone(), Arc::clone(&self.hasher));
        let inner = CacheDictionary::cumulative(persistent, &self.config.inner_cache)?;
        Ok(TransientDictionary::new(
            format!("{name}_inline"),
            self.config.transient.literal_threshold,
            Box::new(inner),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counted::LookupStats;
    use crate::error::DictError;
    use crate::known::KNOWN_ID_LEN;
    use crate::persistent::PERSISTENT_ID_LEN;
    use crate::testing::FailingFactory;
    use cirrus_store::InMemoryIndexFactory;
    use cirrus_types::{markers, Literal};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn config(threshold: i64, known_terms: bool) -> DictionaryConfig {
        let mut config = DictionaryConfig::default();
        config.transient.literal_threshold = threshold;
        config.known_terms.enabled = known_terms;
        config
    }

    fn open(chain: DictResult<TermDictionary>) -> (TermDictionary, InMemoryIndexFactory) {
        init_tracing();
        let factory = InMemoryIndexFactory::new();
        let mut dict = chain.unwrap();
        dict.initialise(&factory).unwrap();
        (dict, factory)
    }

    fn sample_terms() -> Vec<Term> {
        vec![
            Term::resource("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
            Term::resource("http://example.org/people#carol"),
            Term::bnode("n1"),
            Term::literal(Literal::plain("short")),
            Term::literal(Literal::with_language("a label that is long", "en")),
            Term::literal(Literal::typed(
                "2024-01-01",
                "http://www.w3.org/2001/XMLSchema#dateTime",
            )),
        ]
    }

    #[test]
    fn standard_chain_roundtrip() {
        let (dict, _factory) = open(ChainBuilder::new(config(8, true)).build());
        for predicate in [false, true] {
            for term in sample_terms() {
                let id = dict.get_id(Some(&term), predicate).unwrap().unwrap();
                let value = dict.get_value(Some(id.as_bytes()), predicate).unwrap();
                assert_eq!(value, Some(term.clone()));
                assert_eq!(dict.kind_of(&id), Some(term.kind()));
                assert_eq!(dict.get_id(Some(&term), predicate).unwrap(), Some(id));
            }
        }
        let stats = dict.stats();
        assert_eq!(stats.id_lookups, 24);
        assert_eq!(stats.value_lookups, 12);
    }

    #[test]
    fn standard_chain_encodings() {
        let (dict, factory) = open(ChainBuilder::new(config(8, true)).build());

        let rdf_type = Term::resource("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
        let id = dict.get_id(Some(&rdf_type), true).unwrap().unwrap();
        assert_eq!((id[0], id.len()), (markers::KNOWN, KNOWN_ID_LEN));

        let other = Term::resource("http://example.org/x");
        let id = dict.get_id(Some(&other), false).unwrap().unwrap();
        assert_eq!(&id[..2], &[markers::THRESHOLD_NOT_EXCEEDED, markers::RESOURCE]);

        let long = Term::literal(Literal::plain("nine char"));
        let id = dict.get_id(Some(&long), false).unwrap().unwrap();
        assert_eq!(id[0], markers::THRESHOLD_EXCEEDED);
        assert_eq!(id[1], markers::LITERAL);
        assert_eq!(id.len(), 1 + PERSISTENT_ID_LEN);

        assert_eq!(factory.index("terms_known").unwrap().len(), 1);
        assert_eq!(factory.index("terms").unwrap().len(), 1);
    }

    #[test]
    fn predicate_then_subject_lookup_resolves_both_ways() {
        let (dict, factory) = open(ChainBuilder::new(config(4, true)).build());
        let long = Term::literal(Literal::plain("a long literal"));

        let p_id = dict.get_id(Some(&long), true).unwrap().unwrap();
        let s_id = dict.get_id(Some(&long), false).unwrap().unwrap();
        assert_eq!(dict.get_value(Some(s_id.as_bytes()), false).unwrap(), Some(long.clone()));
        assert_eq!(dict.get_value(Some(p_id.as_bytes()), true).unwrap(), Some(long));

        assert_eq!(factory.index("terms").unwrap().len(), 1);
        assert_eq!(factory.index("terms_predicates").unwrap().len(), 1);
    }

    #[test]
    fn irregular_terms_roundtrip() {
        let terms = [
            Term::literal(Literal::with_language("hello", "en_US")),
            Term::literal(Literal::with_language("a label that is long", "en US")),
            Term::resource("http://example.org/a>b"),
            Term::bnode(""),
        ];
        for chain in [
            ChainBuilder::new(config(8, true)).build(),
            ChainBuilder::new(config(8, true)).build_tiered(),
        ] {
            let (dict, _factory) = open(chain);
            for term in &terms {
                let id = dict.get_id(Some(term), false).unwrap().unwrap();
                let value = dict.get_value(Some(id.as_bytes()), false).unwrap();
                assert_eq!(value.as_ref(), Some(term));
            }
        }
    }

    #[test]
    fn known_terms_can_be_disabled() {
        let (dict, factory) = open(ChainBuilder::new(config(8, false)).build());
        let rdf_type = Term::resource("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
        let id = dict.get_id(Some(&rdf_type), false).unwrap().unwrap();
        assert_eq!(id[0], markers::THRESHOLD_NOT_EXCEEDED);
        assert!(factory.index("terms_known").is_none());
    }

    #[test]
    fn null_terms_never_reach_the_chain() {
        let (dict, _factory) = open(ChainBuilder::new(DictionaryConfig::default()).build());
        assert_eq!(dict.get_id(None, false).unwrap(), None);
        assert_eq!(dict.get_value(None, false).unwrap(), None);
        assert_eq!(dict.stats(), LookupStats::default());
    }

    #[test]
    fn tiered_chain_roundtrip() {
        let builder = ChainBuilder::new(config(8, true))
            .with_sequence(Arc::new(IdSequence::starting_at(3, 1)));
        let (dict, factory) = open(builder.build_tiered());
        for predicate in [false, true] {
            for term in sample_terms() {
                let id = dict.get_id(Some(&term), predicate).unwrap().unwrap();
                if term.is_resource() {
                    assert_eq!(id[0], markers::TIERED);
                }
                assert_eq!(dict.get_value(Some(id.as_bytes()), predicate).unwrap(), Some(term));
            }
        }
        assert_eq!(factory.index("terms_namespaces").unwrap().len(), 2);
        assert_eq!(factory.index("terms_local_names").unwrap().len(), 2);
    }

    #[test]
    fn lifecycle_is_idempotent() {
        let (mut dict, factory) = open(ChainBuilder::new(DictionaryConfig::default()).build());
        dict.initialise(&factory).unwrap();
        dict.close().unwrap();
        dict.close().unwrap();
        assert!(matches!(dict.initialise(&factory), Err(DictError::Closed(_))));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = DictionaryConfig::default();
        config.inner_cache.id_cache_size = 0;
        assert!(matches!(
            ChainBuilder::new(config).build(),
            Err(DictError::InvalidConfig(_))
        ));
    }

    #[test]
    fn backend_failures_surface_as_data_access() {
        init_tracing();
        let mut dict = ChainBuilder::new(config(4, true)).build().unwrap();
        dict.initialise(&FailingFactory).unwrap();

        // inline terms never touch the backend
        let short = Term::literal(Literal::plain("ok"));
        assert!(dict.get_id(Some(&short), false).unwrap().is_some());

        let long = Term::literal(Literal::plain("too long"));
        assert!(matches!(
            dict.get_id(Some(&long), false),
            Err(DictError::DataAccess(_))
        ));
        let known = Term::resource("http://www.w3.org/2002/07/owl#Class");
        assert!(matches!(
            dict.get_id(Some(&known), false),
            Err(DictError::DataAccess(_))
        ));
    }
}
