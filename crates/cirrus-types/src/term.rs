use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TermError;
use crate::id::markers;
use crate::ntriples;

/// The three kinds of RDF term a dictionary can encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermKind {
    Resource,
    BNode,
    Literal,
}

impl TermKind {
    /// The marker byte identifying this kind inside an identifier.
    pub const fn marker(self) -> u8 {
        match self {
            Self::Resource => markers::RESOURCE,
            Self::BNode => markers::BNODE,
            Self::Literal => markers::LITERAL,
        }
    }

    /// Parse a kind marker byte.
    pub fn from_marker(byte: u8) -> Option<Self> {
        match byte {
            markers::RESOURCE => Some(Self::Resource),
            markers::BNODE => Some(Self::BNode),
            markers::LITERAL => Some(Self::Literal),
            _ => None,
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resource => "resource",
            Self::BNode => "blank node",
            Self::Literal => "literal",
        };
        f.write_str(name)
    }
}

/// What qualifies a literal's lexical label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Annotation {
    /// A plain literal with neither language tag nor datatype.
    Plain,
    /// A language-tagged string, e.g. `"chat"@fr`.
    Language(String),
    /// A typed literal, e.g. `"1"^^<http://www.w3.org/2001/XMLSchema#int>`.
    Datatype(String),
}

/// An RDF literal: a lexical label plus an optional language tag or datatype.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    label: String,
    annotation: Annotation,
}

impl Literal {
    pub fn plain(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            annotation: Annotation::Plain,
        }
    }

    pub fn with_language(label: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            annotation: Annotation::Language(language.into()),
        }
    }

    pub fn typed(label: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            annotation: Annotation::Datatype(datatype.into()),
        }
    }

    /// The lexical label.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn language(&self) -> Option<&str> {
        match &self.annotation {
            Annotation::Language(lang) => Some(lang),
            _ => None,
        }
    }

    pub fn datatype(&self) -> Option<&str> {
        match &self.annotation {
            Annotation::Datatype(dt) => Some(dt),
            _ => None,
        }
    }

    /// Length of the label in characters (not bytes).
    pub fn label_chars(&self) -> usize {
        self.label.chars().count()
    }
}

/// An immutable RDF term.
///
/// Terms compare structurally. The canonical textual form is N-Triples
/// (see [`Term::to_ntriples`]), which is what persistent dictionaries hash
/// and store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    /// A resource identified by an IRI.
    Resource(String),
    /// A blank node identified by its label (without the `_:` prefix).
    BNode(String),
    Literal(Literal),
}

impl Term {
    pub fn resource(iri: impl Into<String>) -> Self {
        Self::Resource(iri.into())
    }

    pub fn bnode(label: impl Into<String>) -> Self {
        Self::BNode(label.into())
    }

    pub fn literal(literal: Literal) -> Self {
        Self::Literal(literal)
    }

    pub fn kind(&self) -> TermKind {
        match self {
            Self::Resource(_) => TermKind::Resource,
            Self::BNode(_) => TermKind::BNode,
            Self::Literal(_) => TermKind::Literal,
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(_))
    }

    pub fn is_bnode(&self) -> bool {
        matches!(self, Self::BNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// The IRI of a resource, `None` for other kinds.
    pub fn iri(&self) -> Option<&str> {
        match self {
            Self::Resource(iri) => Some(iri),
            _ => None,
        }
    }

    /// Namespace of a resource IRI; see [`split_iri`].
    pub fn namespace(&self) -> Option<&str> {
        self.iri().map(|iri| split_iri(iri).0)
    }

    /// Local name of a resource IRI; see [`split_iri`].
    pub fn local_name(&self) -> Option<&str> {
        self.iri().map(|iri| split_iri(iri).1)
    }

    /// Canonical N-Triples form.
    pub fn to_ntriples(&self) -> String {
        ntriples::format(self)
    }

    /// Parse N-Triples text, inferring the kind from its first character.
    pub fn parse(text: &str) -> Result<Self, TermError> {
        ntriples::parse(text)
    }

    /// Parse N-Triples text that must be of the given kind.
    pub fn parse_as(kind: TermKind, text: &str) -> Result<Self, TermError> {
        ntriples::parse_as(kind, text)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ntriples())
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

/// Split an IRI into `(namespace, local_name)`.
///
/// The namespace ends after the last `#`, else the last `/`, else the last
/// `:`. Without any separator the whole IRI is the local name.
/// `namespace + local_name` always equals the input.
pub fn split_iri(iri: &str) -> (&str, &str) {
    let cut = iri
        .rfind('#')
        .or_else(|| iri.rfind('/'))
        .or_else(|| iri.rfind(':'))
        .map(|i| i + 1)
        .unwrap_or(0);
    iri.split_at(cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    const XSD_INT: &str = "http://www.w3.org/2001/XMLSchema#int";

    #[test]
    fn kind_markers_roundtrip() {
        for kind in [TermKind::Resource, TermKind::BNode, TermKind::Literal] {
            assert_eq!(TermKind::from_marker(kind.marker()), Some(kind));
        }
        assert_eq!(TermKind::from_marker(markers::NOT_SET), None);
        assert_eq!(TermKind::from_marker(0), None);
    }

    #[test]
    fn split_on_hash() {
        let (ns, local) = split_iri("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
        assert_eq!(ns, "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
        assert_eq!(local, "type");
    }

    #[test]
    fn split_on_slash() {
        let (ns, local) = split_iri("http://xmlns.com/foaf/0.1/name");
        assert_eq!(ns, "http://xmlns.com/foaf/0.1/");
        assert_eq!(local, "name");
    }

    #[test]
    fn split_prefers_hash_over_later_slash() {
        let (ns, local) = split_iri("http://example.org/a#b/c");
        assert_eq!(ns, "http://example.org/a#");
        assert_eq!(local, "b/c");
    }

    #[test]
    fn split_on_colon_only() {
        assert_eq!(split_iri("urn:isbn"), ("urn:", "isbn"));
    }

    #[test]
    fn split_without_separator() {
        assert_eq!(split_iri("plain"), ("", "plain"));
    }

    #[test]
    fn split_with_trailing_separator() {
        assert_eq!(split_iri("http://example.org/"), ("http://example.org/", ""));
    }

    #[test]
    fn namespace_only_for_resources() {
        let r = Term::resource("http://example.org/thing");
        assert_eq!(r.namespace(), Some("http://example.org/"));
        assert_eq!(r.local_name(), Some("thing"));
        assert_eq!(Term::bnode("b0").namespace(), None);
        assert_eq!(Term::literal(Literal::plain("x")).local_name(), None);
    }

    #[test]
    fn literal_accessors() {
        let lit = Literal::typed("42", XSD_INT);
        assert_eq!(lit.label(), "42");
        assert_eq!(lit.datatype(), Some(XSD_INT));
        assert_eq!(lit.language(), None);

        let lang = Literal::with_language("chat", "fr");
        assert_eq!(lang.language(), Some("fr"));
        assert_eq!(lang.datatype(), None);
    }

    #[test]
    fn label_chars_counts_characters() {
        assert_eq!(Literal::plain("ümlaut").label_chars(), 6);
        assert_eq!(Literal::plain("ümlaut").label().len(), 7);
    }

    #[test]
    fn structural_equality() {
        assert_eq!(
            Term::literal(Literal::with_language("a", "en")),
            Term::literal(Literal::with_language("a", "en"))
        );
        assert_ne!(
            Term::literal(Literal::plain("a")),
            Term::literal(Literal::with_language("a", "en"))
        );
        assert_ne!(Term::resource("x"), Term::bnode("x"));
    }

    #[test]
    fn serde_roundtrip() {
        let term = Term::literal(Literal::typed("2024-01-01", XSD_INT));
        let json = serde_json::to_string(&term).unwrap();
        let parsed: Term = serde_json::from_str(&json).unwrap();
        assert_eq!(term, parsed);
    }
}
