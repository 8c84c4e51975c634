//! Per-lookup context threaded through a dictionary chain.

/// Where the value carried back up the chain came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Origin {
    /// Nothing recorded yet (or a cache hit answered the call).
    #[default]
    Unset,
    /// Produced by the dictionary directly below the next enclosing cache.
    Fresh,
    /// Already claimed by a cache further down the chain.
    Consumed,
}

/// State shared by every dictionary taking part in one top-level lookup.
///
/// A concrete dictionary calls [`LookupContext::mark_fresh`] immediately
/// before returning a value it produced itself. The first enclosing cache
/// decorator then [`consume`](LookupContext::consume)s the flag, so no cache
/// further out sees the result as fresh. A context lives for exactly one
/// top-level call and is passed by `&mut`, so it is never shared between
/// threads.
#[derive(Clone, Debug, Default)]
pub struct LookupContext {
    origin: Origin,
}

impl LookupContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn is_fresh(&self) -> bool {
        self.origin == Origin::Fresh
    }

    /// Record that the value about to be returned was produced here.
    pub fn mark_fresh(&mut self) {
        self.origin = Origin::Fresh;
    }

    /// Claim the current origin, leaving [`Origin::Consumed`] behind.
    pub fn consume(&mut self) -> Origin {
        std::mem::replace(&mut self.origin, Origin::Consumed)
    }
}
