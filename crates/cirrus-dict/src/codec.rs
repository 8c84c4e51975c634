//! Composite identifier packing and fixed-width counter encoding.
//!
//! Composite layout (big-endian):
//!
//! ```text
//! [u16 part count] { [u16 part length][part bytes] }*
//! ```
//!
//! The format is self-describing: part count and lengths are recovered from
//! the bytes alone, so sub-identifiers may differ in length.

use bytes::{Buf, BufMut, BytesMut};
use cirrus_types::ValueId;

/// Width of an encoded counter identifier.
pub const COUNTER_LEN: usize = 8;

/// Smallest number of parts a composite identifier packs.
pub const MIN_PARTS: usize = 2;

/// Errors from composite identifier encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("composite identifier needs at least {MIN_PARTS} parts, got {0}")]
    TooFewParts(usize),

    #[error("composite identifier cannot hold {0} parts")]
    TooManyParts(usize),

    #[error("part {index} is {len} bytes, longer than a u16 length prefix allows")]
    PartTooLong { index: usize, len: usize },

    #[error(
        "truncated composite identifier: needed {needed} bytes at offset {offset}, \
         {available} available"
    )]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{0} trailing bytes after the last part")]
    TrailingBytes(usize),

    #[error("counter identifier must be {COUNTER_LEN} bytes, got {0}")]
    InvalidCounterLength(usize),
}

/// Pack two or more sub-identifiers into one composite identifier.
pub fn compose(parts: &[&[u8]]) -> Result<ValueId, CodecError> {
    if parts.len() < MIN_PARTS {
        return Err(CodecError::TooFewParts(parts.len()));
    }
    let count = u16::try_from(parts.len()).map_err(|_| CodecError::TooManyParts(parts.len()))?;

    let body: usize = parts.iter().map(|p| 2 + p.len()).sum();
    let mut buf = BytesMut::with_capacity(2 + body);
    buf.put_u16(count);
    for (index, part) in parts.iter().enumerate() {
        let len = u16::try_from(part.len()).map_err(|_| CodecError::PartTooLong {
            index,
            len: part.len(),
        })?;
        buf.put_u16(len);
        buf.put_slice(part);
    }
    Ok(ValueId::new(buf.freeze()))
}

/// Unpack a composite identifier into its parts, in order.
pub fn decompose(id: &[u8]) -> Result<Vec<ValueId>, CodecError> {
    let total = id.len();
    let mut cursor = id;
    let count = read_u16(&mut cursor, total)?;
    if usize::from(count) < MIN_PARTS {
        return Err(CodecError::TooFewParts(usize::from(count)));
    }

    let mut parts = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let len = usize::from(read_u16(&mut cursor, total)?);
        if cursor.remaining() < len {
            return Err(CodecError::Truncated {
                offset: total - cursor.remaining(),
                needed: len,
                available: cursor.remaining(),
            });
        }
        parts.push(ValueId::copy_from_slice(&cursor[..len]));
        cursor.advance(len);
    }
    if cursor.has_remaining() {
        return Err(CodecError::TrailingBytes(cursor.remaining()));
    }
    Ok(parts)
}

fn read_u16(cursor: &mut &[u8], total: usize) -> Result<u16, CodecError> {
    if cursor.remaining() < 2 {
        return Err(CodecError::Truncated {
            offset: total - cursor.remaining(),
            needed: 2,
            available: cursor.remaining(),
        });
    }
    Ok(cursor.get_u16())
}

/// Encode a counter as a fixed-width big-endian identifier.
pub fn encode_counter(value: u64) -> [u8; COUNTER_LEN] {
    value.to_be_bytes()
}

/// Decode a fixed-width counter identifier.
pub fn decode_counter(bytes: &[u8]) -> Result<u64, CodecError> {
    let arr: [u8; COUNTER_LEN] = bytes
        .try_into()
        .map_err(|_| CodecError::InvalidCounterLength(bytes.len()))?;
    Ok(u64::from_be_bytes(arr))
}
