use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Bits of a sequence value below the node identifier.
const COUNTER_BITS: u32 = 48;
const COUNTER_MASK: u64 = (1 << COUNTER_BITS) - 1;

/// Monotonic source of fresh 64-bit identifiers.
///
/// The top 16 bits hold the node identifier; the low 48 bits start at the
/// wall-clock millisecond the sequence was created and count up from there.
/// A restarted node therefore resumes above every value it handed out
/// before, as long as it allocated fewer than one id per millisecond of
/// downtime on average. Distinct nodes never overlap.
///
/// Share one instance (behind an `Arc`) between every component that needs
/// ids from the same space.
#[derive(Debug)]
pub struct IdSequence {
    node_id: u16,
    next: AtomicU64,
}

impl IdSequence {
    /// Seed a sequence for `node_id` from the current wall clock.
    pub fn new(node_id: u16) -> Self {
        Self::starting_at(node_id, Self::wall_clock_ms())
    }

    /// Seed a sequence with an explicit counter start (masked to 48 bits).
    pub fn starting_at(node_id: u16, start: u64) -> Self {
        Self {
            node_id,
            next: AtomicU64::new(start & COUNTER_MASK),
        }
    }

    /// Take the next identifier.
    pub fn next(&self) -> u64 {
        let counter = self.next.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        (u64::from(self.node_id) << COUNTER_BITS) | counter
    }

    pub fn node_id(&self) -> u16 {
        self.node_id
    }

    fn wall_clock_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}
