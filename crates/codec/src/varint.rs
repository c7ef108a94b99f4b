//! Unsigned LEB128 (`varuint32`) primitives.
//!
//! A `varuint32` occupies at most 5 bytes; the fifth byte may only carry the
//! remaining 4 value bits and must not have its continuation bit set.

use contracts::DecodeError;

/// Read a `varuint32` from the front of `buf`, returning the value and the
/// number of bytes consumed.
pub(crate) fn read_varuint32(buf: &[u8]) -> Result<(u32, usize), DecodeError> {
    let mut value: u32 = 0;
    for (i, &byte) in buf.iter().enumerate().take(5) {
        let bits = u32::from(byte & 0x7f);
        // Last allowed byte: anything beyond 32 bits total is an overflow
        if i == 4 && (byte & 0x80 != 0 || bits > 0x0f) {
            return Err(DecodeError::malformed("varuint32 overflows 32 bits"));
        }
        value |= bits << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(DecodeError::malformed("truncated varuint32"))
}

/// Append `value` to `out` as a `varuint32`.
pub(crate) fn write_varuint32(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}
