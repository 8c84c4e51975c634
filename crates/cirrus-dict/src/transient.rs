//! Inline dictionary: the term's own text is its identifier.
//!
//! ```text
//! [THRESHOLD_NOT_EXCEEDED][kind marker][UTF-8 text]   inline
//! [THRESHOLD_EXCEEDED][delegate identifier]           delegated
//! ```
//!
//! Inline text is the IRI for resources, the label for blank nodes and the
//! N-Triples form for literals. Literals whose label is longer than the
//! threshold (in characters) go to the delegate instead.

use cirrus_store::IndexFactory;
use cirrus_types::{markers, Literal, Term, TermKind, ValueId};
use tracing::debug;

use crate::context::LookupContext;
use crate::dictionary::Dictionary;
use crate::error::{DictError, DictResult};

/// Literal label length, in characters, above which literals are delegated.
pub const DEFAULT_LITERAL_THRESHOLD: usize = 1000;

/// Resolve a configured threshold: `0` disables delegation, a negative
/// value selects [`DEFAULT_LITERAL_THRESHOLD`].
pub fn effective_threshold(configured: i64) -> usize {
    match configured {
        0 => usize::MAX,
        n if n < 0 => DEFAULT_LITERAL_THRESHOLD,
        n => usize::try_from(n).unwrap_or(usize::MAX),
    }
}

pub struct TransientDictionary {
    name: String,
    threshold: usize,
    delegate: Option<Box<dyn Dictionary<Term>>>,
}

impl TransientDictionary {
    /// Inline dictionary delegating literals longer than `threshold`
    /// characters (see [`effective_threshold`]).
    pub fn new(
        name: impl Into<String>,
        threshold: i64,
        delegate: Box<dyn Dictionary<Term>>,
    ) -> Self {
        Self {
            name: name.into(),
            threshold: effective_threshold(threshold),
            delegate: Some(delegate),
        }
    }

    /// Inline dictionary that never delegates.
    pub fn inline_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            threshold: usize::MAX,
            delegate: None,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    fn exceeds(&self, literal: &Literal) -> bool {
        // byte length bounds the character count from above
        if literal.label().len() <= self.threshold {
            return false;
        }
        literal.label_chars() > self.threshold
    }

    fn delegate(&self) -> DictResult<&dyn Dictionary<Term>> {
        self.delegate.as_deref().ok_or_else(|| {
            DictError::InvalidConfig(format!("dictionary {} has no delegate", self.name))
        })
    }

    fn inline_id(term: &Term) -> ValueId {
        let text = match term {
            Term::Resource(iri) => iri.clone(),
            Term::BNode(label) => label.clone(),
            Term::Literal(_) => term.to_ntriples(),
        };
        let mut id = Vec::with_capacity(2 + text.len());
        id.push(markers::THRESHOLD_NOT_EXCEEDED);
        id.push(term.kind().marker());
        id.extend_from_slice(text.as_bytes());
        ValueId::from(id)
    }

    fn inline_value(id: &[u8]) -> DictResult<Term> {
        let kind = id
            .get(1)
            .and_then(|&marker| TermKind::from_marker(marker))
            .ok_or_else(|| DictError::malformed(id, "inline identifier without a term kind"))?;
        let text = std::str::from_utf8(&id[2..])
            .map_err(|e| DictError::malformed(id, format!("inline text is not UTF-8: {e}")))?;
        Ok(match kind {
            TermKind::Resource => Term::resource(text),
            TermKind::BNode => Term::bnode(text),
            TermKind::Literal => Term::parse_as(TermKind::Literal, text)?,
        })
    }
}

impl Dictionary<Term> for TransientDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialise(&mut self, factory: &dyn IndexFactory) -> DictResult<()> {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.initialise(factory)?;
        }
        debug!(
            dictionary = %self.name,
            threshold = self.threshold,
            delegated = self.delegate.is_some(),
            "transient dictionary initialised"
        );
        Ok(())
    }

    fn close(&mut self) -> DictResult<()> {
        match self.delegate.as_mut() {
            Some(delegate) => delegate.close(),
            None => Ok(()),
        }
    }

    fn get_id(
        &self,
        value: &Term,
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<ValueId> {
        if let Term::Literal(literal) = value {
            if self.exceeds(literal) {
                let inner = self.delegate()?.get_id(value, predicate, ctx)?;
                let mut id = Vec::with_capacity(1 + inner.len());
                id.push(markers::THRESHOLD_EXCEEDED);
                id.extend_from_slice(&inner);
                return Ok(ValueId::from(id));
            }
        }
        let id = Self::inline_id(value);
        ctx.mark_fresh();
        Ok(id)
    }

    fn get_value(
        &self,
        id: &[u8],
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<Option<Term>> {
        match id.first() {
            Some(&markers::THRESHOLD_NOT_EXCEEDED) => {
                let term = Self::inline_value(id)?;
                ctx.mark_fresh();
                Ok(Some(term))
            }
            Some(&markers::THRESHOLD_EXCEEDED) => {
                self.delegate()?.get_value(&id[1..], predicate, ctx)
            }
            _ => Err(DictError::malformed(id, "not a transient identifier")),
        }
    }

    fn remove_value(
        &self,
        value: &Term,
        predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<()> {
        match value {
            Term::Literal(literal) if self.exceeds(literal) => {
                self.delegate()?.remove_value(value, predicate, ctx)
            }
            _ => Ok(()),
        }
    }

    fn kind_of(&self, id: &[u8]) -> Option<TermKind> {
        match id.first() {
            Some(&markers::THRESHOLD_NOT_EXCEEDED) => {
                id.get(1).and_then(|&marker| TermKind::from_marker(marker))
            }
            Some(&markers::THRESHOLD_EXCEEDED) => match self.delegate.as_deref() {
                Some(delegate) => delegate.kind_of(&id[1..]),
                None => None,
            },
            _ => None,
        }
    }
}

impl std::fmt::Debug for TransientDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransientDictionary")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("delegate", &self.delegate.as_ref().map(|d| d.name().to_string()))
            .finish()
    }
}
