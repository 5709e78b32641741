//! In-memory cursor over the body buffer.
//!
//! A position-tracked, bounds-checked reader over the already-buffered
//! body (§4.2: "From this point on, every read is from the in-memory
//! buffer at a monotonically advancing cursor").

use crate::error::{FramingError, Result};
use crate::token;

pub(crate) struct BodyCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BodyCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BodyCursor { data, pos: 0 }
    }

    /// Current cursor position, measured from the start of the body.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read before the end of the body.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Reads and advances past one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads one byte without advancing the cursor.
    pub fn peek_u8(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(FramingError::ValueTruncated {
                expected: 1,
                got: 0,
            })
            .map_err(Into::into)
    }

    /// Reads and advances past exactly `n` bytes, failing with a
    /// truncation error if fewer remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(FramingError::ValueTruncated {
                expected: n,
                got: self.remaining(),
            }
            .into());
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads a length prefix (§4.3): a one-byte integer-type tag followed
    /// by its native-endian payload. Rejects negative values and values
    /// beyond `i32::MAX`, matching the envelope's own range check — the
    /// same "BSER length out of range" failure applies wherever a length
    /// is read, not only in the envelope. Does NOT check the value
    /// against `remaining()`; callers whose declared count maps directly
    /// to a byte count (strings) must do that themselves, since for
    /// arrays/objects the element count alone doesn't bound the bytes
    /// consumed (§4.3: "the implementation may NOT pre-validate N against
    /// remaining bytes").
    pub fn read_length(&mut self) -> Result<i64> {
        let tag = self.read_u8()?;
        let width = token::length_width(tag).ok_or(FramingError::UnrecognizedLengthType(tag))?;
        let bytes = self.read_bytes(width)?;
        let value = token::decode_signed(width, bytes);
        if value < 0 {
            return Err(FramingError::LengthNegative(value).into());
        }
        if value > i32::MAX as i64 {
            return Err(FramingError::LengthTooLarge(value).into());
        }
        Ok(value)
    }
}
