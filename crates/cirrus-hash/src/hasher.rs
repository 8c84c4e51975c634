use xxhash_rust::xxh3::Xxh3;

/// Width of a term hash in bytes.
pub const HASH_LEN: usize = 16;

/// 128-bit hash of a term's textual form.
///
/// Implementations must be deterministic across processes: dictionaries
/// persist the identifiers derived from these hashes.
pub trait TermHasher: Send + Sync {
    fn hash128(&self, data: &[u8]) -> [u8; HASH_LEN];
}

/// Domain-separated xxh3-128 hasher.
///
/// Each hasher carries a domain tag prepended to every hash computation, so
/// two dictionaries hashing the same text into different identifier spaces
/// start from unrelated values. Not a cryptographic hash: collisions are
/// resolved by probing, not prevented.
#[derive(Clone, Copy, Debug)]
pub struct Xxh3Hasher {
    domain: &'static str,
}

impl Xxh3Hasher {
    /// Hasher for general term identifiers.
    pub const TERMS: Self = Self {
        domain: "cirrus-term-v1",
    };
    /// Hasher for well-known vocabulary identifiers.
    pub const KNOWN_TERMS: Self = Self {
        domain: "cirrus-known-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    pub fn domain(&self) -> &str {
        self.domain
    }
}

impl Default for Xxh3Hasher {
    fn default() -> Self {
        Self::TERMS
    }
}

impl TermHasher for Xxh3Hasher {
    fn hash128(&self, data: &[u8]) -> [u8; HASH_LEN] {
        let mut hasher = Xxh3::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        hasher.digest128().to_be_bytes()
    }
}
