//! Backing index contract for the Cirrus term dictionary.
//!
//! A dictionary persists its text ↔ identifier pairs in a [`TermIndex`]
//! obtained from an [`IndexFactory`] when it is initialised. The index is a
//! pure key-value store: it never interprets identifier bytes or term text.
//!
//! # Backends
//!
//! - [`InMemoryTermIndex`] / [`InMemoryIndexFactory`] -- `HashMap`-based,
//!   for tests and embedding
//!
//! Production deployments plug in their own column-family backed
//! implementation of the same traits.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryIndexFactory, InMemoryTermIndex};
pub use traits::{IndexFactory, TermIndex};
