//! Admission strategies for [`crate::CacheDictionary`].

use std::fmt::Debug;

use crate::context::{LookupContext, Origin};

/// Decides whether a cache decorator stores a result it fetched from the
/// dictionary it wraps.
///
/// `admit` is called once per cache miss and must consume the context's
/// origin, so that no cache further out in the chain sees the same result
/// as fresh.
pub trait CacheStrategy: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    fn admit(&self, ctx: &mut LookupContext) -> bool;
}

/// Store only results produced directly beneath this cache.
///
/// Placed at the top of a chain, this keeps results already cached further
/// down out of the outer cache.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstLevel;

impl CacheStrategy for FirstLevel {
    fn name(&self) -> &'static str {
        "first-level"
    }

    fn admit(&self, ctx: &mut LookupContext) -> bool {
        ctx.consume() == Origin::Fresh
    }
}

/// Store every result.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cumulative;

impl CacheStrategy for Cumulative {
    fn name(&self) -> &'static str {
        "cumulative"
    }

    fn admit(&self, ctx: &mut LookupContext) -> bool {
        ctx.consume();
        true
    }
}
