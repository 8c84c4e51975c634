//! Hash-based identifier allocation with bounded linear probing.

use cirrus_hash::next_probe;
use cirrus_store::TermIndex;
use cirrus_types::ValueId;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::DictResult;

/// Probes attempted before an overwrite is accepted.
pub const MAX_PROBES: usize = 100;

/// Serialises identifier allocation for one dictionary instance.
///
/// Lookups of already-stored text never take the lock. Allocation re-checks
/// the index under the lock so two threads racing on the same text agree on
/// one identifier.
#[derive(Debug, Default)]
pub(crate) struct HashAllocator {
    lock: Mutex<()>,
}

impl HashAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Identifier stored for `text`, allocating `candidate()` (probed past
    /// any identifier already in use) when there is none.
    pub(crate) fn lookup_or_allocate(
        &self,
        dictionary: &str,
        index: &dyn TermIndex,
        text: &str,
        candidate: impl FnOnce() -> Vec<u8>,
    ) -> DictResult<ValueId> {
        if let Some(id) = stored_id(index, text)? {
            return Ok(id);
        }

        let _guard = self.lock.lock();
        if let Some(id) = stored_id(index, text)? {
            return Ok(id);
        }

        let mut id = candidate();
        let mut probes = 0;
        while index.contains(&id)? {
            if probes == MAX_PROBES {
                warn!(
                    dictionary,
                    text,
                    id = %ValueId::copy_from_slice(&id),
                    "collision bound exceeded; overwriting existing identifier"
                );
                break;
            }
            next_probe(&mut id);
            probes += 1;
        }

        let id = ValueId::from(id);
        index.put_quick(text, &id)?;
        debug!(dictionary, id = %id.short_hex(), probes, "allocated identifier");
        Ok(id)
    }
}

/// Stored identifier for `text`, treating a `NOT_SET` entry as absent.
pub(crate) fn stored_id(index: &dyn TermIndex, text: &str) -> DictResult<Option<ValueId>> {
    Ok(index.get(text)?.filter(|id| !id.is_not_set()))
}
