//! Linear probing over hash-derived identifiers.

/// Number of trailing bytes treated as the probe counter.
pub const PROBE_SUFFIX_LEN: usize = 8;

/// Perturb an identifier to the next probe position.
///
/// Adds one (wrapping) to the big-endian integer formed by the trailing
/// [`PROBE_SUFFIX_LEN`] bytes; identifiers shorter than that are treated as
/// a whole. Leading marker bytes outside the suffix are never touched.
pub fn next_probe(id: &mut [u8]) {
    let start = id.len().saturating_sub(PROBE_SUFFIX_LEN);
    let suffix = &mut id[start..];
    for byte in suffix.iter_mut().rev() {
        let (next, overflow) = byte.overflowing_add(1);
        *byte = next;
        if !overflow {
            return;
        }
    }
}
