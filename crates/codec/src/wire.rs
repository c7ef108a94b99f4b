//! Envelope decode/encode over the version-0 wire layout.

use bytes::Bytes;
use contracts::{DecodeError, Envelope, EnvelopeV0};

use crate::varint::{read_varuint32, write_varuint32};

/// Wire discriminant of the version-0 variant
const VERSION_0: u32 = 0;

/// Decode one serialized envelope.
///
/// Pure function over its input: no side effects, no partially-constructed
/// value on failure. The whole buffer must be consumed; trailing bytes after
/// the payload are a framing error.
pub fn decode(buf: &[u8]) -> Result<Envelope, DecodeError> {
    let mut cursor = Cursor::new(buf);

    let version = cursor.read_varuint32()?;
    if version != VERSION_0 {
        return Err(DecodeError::UnknownVersion(version));
    }

    let route_bytes = cursor.read_length_prefixed("route")?;
    let route = std::str::from_utf8(route_bytes)
        .map_err(|_| DecodeError::malformed("route is not valid UTF-8"))?
        .to_string();

    let payload = Bytes::copy_from_slice(cursor.read_length_prefixed("payload")?);

    if !cursor.is_empty() {
        return Err(DecodeError::malformed(format!(
            "{} trailing bytes after payload",
            cursor.remaining()
        )));
    }

    Ok(Envelope::V0(EnvelopeV0 { route, payload }))
}

/// Encode an envelope to its wire representation. Exact inverse of [`decode`].
pub fn encode(envelope: &Envelope) -> Vec<u8> {
    match envelope {
        Envelope::V0(v0) => {
            let mut out =
                Vec::with_capacity(v0.route.len() + v0.payload.len() + 12);
            write_varuint32(&mut out, VERSION_0);
            write_varuint32(&mut out, v0.route.len() as u32);
            out.extend_from_slice(v0.route.as_bytes());
            write_varuint32(&mut out, v0.payload.len() as u32);
            out.extend_from_slice(&v0.payload);
            out
        }
    }
}

/// Forward-only view over the input buffer.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn read_varuint32(&mut self) -> Result<u32, DecodeError> {
        let (value, used) = read_varuint32(&self.buf[self.pos..])?;
        self.pos += used;
        Ok(value)
    }

    /// Read a varuint32 length followed by that many bytes
    fn read_length_prefixed(&mut self, field: &str) -> Result<&'a [u8], DecodeError> {
        let len = self.read_varuint32()? as usize;
        if len > self.remaining() {
            return Err(DecodeError::malformed(format!(
                "{field} length {len} exceeds {} remaining bytes",
                self.remaining()
            )));
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}
