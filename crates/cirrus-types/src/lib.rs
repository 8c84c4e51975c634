//! Foundation types for the Cirrus term dictionary.
//!
//! Every other Cirrus crate depends on `cirrus-types`.
//!
//! # Key Types
//!
//! - [`Term`]: An RDF resource, blank node, or literal
//! - [`Literal`]: Lexical label with an optional language tag or datatype
//! - [`TermKind`]: Kind tag with its identifier marker byte
//! - [`ValueId`]: Opaque identifier bytes assigned by a dictionary
//! - [`IdSequence`]: Explicit monotonic counter for fresh 64-bit ids
//!
//! The marker bytes shared by every identifier encoding live in
//! [`markers`]; the canonical N-Triples text form in [`ntriples`].

pub mod error;
pub mod id;
pub mod ntriples;
pub mod sequence;
pub mod term;

pub use error::TermError;
pub use id::{markers, ValueId};
pub use sequence::IdSequence;
pub use term::{split_iri, Annotation, Literal, Term, TermKind};
