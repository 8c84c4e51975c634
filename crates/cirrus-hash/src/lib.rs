//! Term hashing for the Cirrus term dictionary.
//!
//! Provides domain-separated xxh3-128 hashing of term text and the linear
//! probing step used to resolve identifier collisions.
//!
//! All hashing wraps an established library; nothing here is cryptographic.

pub mod hasher;
pub mod probe;

pub use hasher::{TermHasher, Xxh3Hasher, HASH_LEN};
pub use probe::{next_probe, PROBE_SUFFIX_LEN};
