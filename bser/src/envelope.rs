//! Envelope reader (§4.1, §6.2): magic, length-type tag, and the body length.

use std::io::Read;

use crate::error::{Error, FramingError, Result};
use crate::token;

/// The validated envelope header: the width the LENGTH field was declared
/// in and the resulting non-negative body length.
pub(crate) struct Envelope {
    pub length_width: usize,
    pub body_length: usize,
}

/// Reads from `reader` until `buf` is full or the stream is exhausted,
/// looping over partial reads and retrying on `Interrupted`. Returns the
/// number of bytes actually obtained, which may be less than `buf.len()`.
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Reads and validates the 3-byte magic/length-type header plus the
/// variable-width LENGTH field, per §4.1.
pub(crate) fn read_envelope(reader: &mut impl Read) -> Result<Envelope> {
    let mut header = [0u8; 3];
    let got = fill(reader, &mut header)?;
    if got != header.len() {
        return Err(Error::header_truncated(header.len(), got));
    }
    if header[0] != token::MAGIC[0] || header[1] != token::MAGIC[1] {
        return Err(FramingError::BadMagic.into());
    }

    let ltype = header[2];
    let width = token::length_width(ltype)
        .ok_or(FramingError::UnrecognizedHeaderLengthType(ltype))?;

    let mut len_buf = [0u8; 8];
    let got = fill(reader, &mut len_buf[..width])?;
    if got != width {
        return Err(FramingError::LengthTruncated {
            expected: width,
            got,
        }
        .into());
    }

    let value = token::decode_signed(width, &len_buf[..width]);
    if value < 0 {
        return Err(FramingError::LengthNegative(value).into());
    }
    if value > i32::MAX as i64 {
        return Err(FramingError::LengthTooLarge(value).into());
    }

    Ok(Envelope {
        length_width: width,
        body_length: value as usize,
    })
}

/// Reads exactly `body_length` bytes into a fresh buffer (§4.2). This is
/// the only allocation sized by attacker-controlled input in the whole
/// decoder, and it only happens after `read_envelope` has range-checked
/// the length against `i32::MAX` (§5).
pub(crate) fn read_body(reader: &mut impl Read, body_length: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; body_length];
    let got = fill(reader, &mut buf)?;
    if got != body_length {
        return Err(Error::header_truncated(body_length, got));
    }
    Ok(buf)
}
