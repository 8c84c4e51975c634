//! String dictionary handing out sequence identifiers.

use std::sync::Arc;

use cirrus_store::{IndexFactory, TermIndex};
use cirrus_types::{IdSequence, ValueId};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::allocator::stored_id;
use crate::codec::{encode_counter, COUNTER_LEN};
use crate::context::LookupContext;
use crate::dictionary::Dictionary;
use crate::error::{DictError, DictResult};

/// Maps strings to fixed-width identifiers taken from an [`IdSequence`].
///
/// Used for the namespace and local-name tiers of
/// [`crate::ThreeTieredDictionary`]. The predicate flag is ignored.
pub struct SequenceStringDictionary {
    name: String,
    sequence: Arc<IdSequence>,
    index: Option<Arc<dyn TermIndex>>,
    lock: Mutex<()>,
}

impl SequenceStringDictionary {
    pub fn new(name: impl Into<String>, sequence: Arc<IdSequence>) -> Self {
        Self {
            name: name.into(),
            sequence,
            index: None,
            lock: Mutex::new(()),
        }
    }

    fn index(&self) -> DictResult<&dyn TermIndex> {
        self.index
            .as_deref()
            .ok_or_else(|| DictError::NotInitialised(self.name.clone()))
    }
}

impl Dictionary<String> for SequenceStringDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialise(&mut self, factory: &dyn IndexFactory) -> DictResult<()> {
        self.index = Some(factory.open(&self.name)?);
        Ok(())
    }

    fn close(&mut self) -> DictResult<()> {
        self.index = None;
        Ok(())
    }

    fn get_id(
        &self,
        value: &String,
        _predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<ValueId> {
        let index = self.index()?;
        let id = match stored_id(index, value)? {
            Some(id) => id,
            None => {
                let _guard = self.lock.lock();
                match stored_id(index, value)? {
                    Some(id) => id,
                    None => {
                        let id = ValueId::from(encode_counter(self.sequence.next()).to_vec());
                        index.put_quick(value, &id)?;
                        debug!(dictionary = %self.name, id = %id, "allocated sequence identifier");
                        id
                    }
                }
            }
        };
        ctx.mark_fresh();
        Ok(id)
    }

    fn get_value(
        &self,
        id: &[u8],
        _predicate: bool,
        ctx: &mut LookupContext,
    ) -> DictResult<Option<String>> {
        if id.len() != COUNTER_LEN {
            return Err(DictError::malformed(
                id,
                format!("sequence identifiers are {COUNTER_LEN} bytes"),
            ));
        }
        match self.index()?.get_quick(id)? {
            Some(text) => {
                ctx.mark_fresh();
                Ok(Some(text))
            }
            None => {
                warn!(
                    dictionary = %self.name,
                    id = %ValueId::copy_from_slice(id),
                    "no string stored for identifier"
                );
                Ok(None)
            }
        }
    }

    fn remove_value(
        &self,
        value: &String,
        _predicate: bool,
        _ctx: &mut LookupContext,
    ) -> DictResult<()> {
        self.index()?.remove(value)?;
        Ok(())
    }
}

impl std::fmt::Debug for SequenceStringDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceStringDictionary")
            .field("name", &self.name)
            .field("sequence", &self.sequence)
            .finish()
    }
}
