//! Base-128 variable-length integers.
//!
//! Each byte carries seven bits of the value in its low bits, least
//! significant group first, and sets its high bit when another byte follows.
//! The accumulated bits are used as-is: there is no zig-zag step, so negative
//! values only appear when an encoder writes all 64 bits.

use tartan_bitfield::bitfield;

use super::{ContentBuffer, ReadError};

/// The longest encoding of a 64-bit value.
pub const MAX_VARINT_LEN: usize = 10;

bitfield! {
    struct VarintByte(u8) {
        [0..7] group: u8,
        [7] has_more,
    }
}

/// Read a variable-length integer from the buffer.
///
/// Fails with [`ReadError::Truncated`] if the buffer is already exhausted,
/// and with [`ReadError::MalformedVarint`] if it runs out mid-sequence or the
/// encoding does not fit in 64 bits.
pub fn read_varint(r: &mut ContentBuffer) -> Result<i64, ReadError> {
    let offset = r.position();
    let malformed = ReadError::MalformedVarint { offset };

    let mut value: u64 = 0;

    for i in 0..MAX_VARINT_LEN {
        let [b] = r.take::<1>().map_err(|e| if i == 0 { e } else { malformed })?;
        let b = VarintByte(b);
        let group = b.group() as u64;

        // Only a single bit of the tenth group fits.
        if i == MAX_VARINT_LEN - 1 && group > 1 {
            Err(malformed)?;
        }

        value |= group << (7 * i);

        if !b.has_more() {
            return Ok(value as i64);
        }
    }

    Err(malformed)
}

/// Decode a variable-length integer from the front of a slice.
///
/// Returns the value and the number of bytes it occupied.
pub fn decode_varint(r: &[u8]) -> Result<(i64, usize), ReadError> {
    let mut r = ContentBuffer::new(r);
    let value = read_varint(&mut r)?;
    Ok((value, r.position()))
}
