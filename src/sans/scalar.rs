//! Fixed-width fields.
//!
//! Offsets are stored big-endian. Floating point values are stored as
//! little-endian IEEE-754 bit patterns; they are assembled into an integer
//! of matching width before being reinterpreted, so decoding does not depend
//! on the host's byte order.

use zerocopy::byteorder::big_endian;

use super::{ContentBuffer, ReadError};

/// Read a signed 32-bit big-endian offset.
pub fn read_flat32(r: &mut ContentBuffer) -> Result<i32, ReadError> {
    let value: big_endian::I32 = zerocopy::transmute!(r.take::<4>()?);
    Ok(value.get())
}

/// Read a 4-byte little-endian IEEE-754 float.
pub fn read_f32(r: &mut ContentBuffer) -> Result<f32, ReadError> {
    Ok(f32::from_bits(u32::from_le_bytes(r.take()?)))
}

/// Read an 8-byte little-endian IEEE-754 float.
pub fn read_f64(r: &mut ContentBuffer) -> Result<f64, ReadError> {
    Ok(f64::from_bits(u64::from_le_bytes(r.take()?)))
}

/// Read a single raw byte, such as a type tag or flag.
pub fn read_u8(r: &mut ContentBuffer) -> Result<u8, ReadError> {
    let [b] = r.take::<1>()?;
    Ok(b)
}
