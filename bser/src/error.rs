
//! BSER decode errors, split into the two categories callers must be able
//! to tell apart: framing/protocol errors and character-coding errors.

use std::error;
use std::fmt::{self, Debug, Display};
use std::io;
use std::result;

/// Alias for `Result` with this crate's error type.
pub type Result<T> = result::Result<T, Error>;

/// Top-level BSER decode error.
///
/// Framing errors cover every failure rooted in the binary structure of
/// the envelope or the body (truncation, bad magic, unknown tags, length
/// out of range, wrong key type). Utf8 errors are raised only when a
/// declared String payload is not valid UTF-8; they are kept distinct so
/// callers can log encoding problems separately from protocol problems.
#[derive(Debug)]
pub enum Error {
    Framing(FramingError),
    Utf8(std::str::Utf8Error),
}

/// All framing/protocol decode failures.
#[derive(Debug)]
pub enum FramingError {
    /// Envelope magic/header or body read came up short.
    /// Reused verbatim for envelope header truncation and for body
    /// truncation (§4.2, §9) — existing Watchman producers rely on
    /// this message being identical in both cases.
    HeaderTruncated { expected: usize, got: usize },

    /// First two header bytes were not `0x00 0x01`.
    BadMagic,

    /// Header's LTYPE byte did not select a recognized length width.
    /// Reports the tag's low nibble, matching scenario 8 in spec §8.2.
    UnrecognizedHeaderLengthType(u8),

    /// Header's LENGTH field came up short.
    LengthTruncated { expected: usize, got: usize },

    /// Declared body length was negative.
    LengthNegative(i64),

    /// Declared body length exceeded `i32::MAX`.
    LengthTooLarge(i64),

    /// A value-type tag (top level or nested) was not one of the 11
    /// recognized tags.
    UnrecognizedValueType(u8),

    /// A length-prefix tag (array/object/string count, or the envelope's
    /// own LENGTH tag when read from inside the body) was not one of
    /// `0x03..=0x06`.
    UnrecognizedLengthType(u8),

    /// An object entry's key did not carry the String type tag.
    UnrecognizedObjectKeyType(u8),

    /// A fixed-width payload, or a declared string/length payload, ran
    /// past the remaining bytes in the body.
    ValueTruncated { expected: usize, got: usize },

    /// Recursive descent exceeded the configured nesting limit.
    NestingTooDeep { limit: usize },

    /// A hard I/O error from the underlying stream (not a short read).
    Io(io::Error),
}

impl Error {
    /// Convenience constructor matching the "expected K bytes, got N
    /// bytes" diagnostic contract (§4.1/§4.2).
    pub(crate) fn header_truncated(expected: usize, got: usize) -> Error {
        Error::Framing(FramingError::HeaderTruncated { expected, got })
    }
}

impl From<FramingError> for Error {
    fn from(e: FramingError) -> Self {
        Error::Framing(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Framing(FramingError::Io(e))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(e: std::str::Utf8Error) -> Self {
        Error::Utf8(e)
    }
}

impl Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FramingError::HeaderTruncated { expected, got } => write!(
                f,
                "Invalid BSER header (expected {} bytes, got {} bytes)",
                expected, got
            ),
            FramingError::BadMagic => f.write_str("Invalid BSER header"),
            FramingError::UnrecognizedHeaderLengthType(tag) => write!(
                f,
                "Unrecognized BSER header length type {}",
                tag & 0x0F
            ),
            FramingError::LengthTruncated { expected, got } => write!(
                f,
                "Invalid BSER header length (expected {} bytes, got {} bytes)",
                expected, got
            ),
            FramingError::LengthNegative(value) => {
                write!(f, "BSER length out of range ({} < 0)", value)
            }
            FramingError::LengthTooLarge(value) => {
                write!(f, "BSER length out of range ({} > 2147483647)", value)
            }
            FramingError::UnrecognizedValueType(tag) => {
                write!(f, "Unrecognized BSER value type {}", tag)
            }
            FramingError::UnrecognizedLengthType(tag) => {
                write!(f, "Unrecognized BSER length type {}", tag)
            }
            FramingError::UnrecognizedObjectKeyType(tag) => write!(
                f,
                "Unrecognized BSER object key type {}, expected string",
                tag
            ),
            FramingError::ValueTruncated { expected, got } => write!(
                f,
                "BSER value truncated (expected {} bytes, got {} bytes)",
                expected, got
            ),
            FramingError::NestingTooDeep { limit } => {
                write!(f, "BSER nesting exceeds depth limit ({})", limit)
            }
            FramingError::Io(ref e) => write!(f, "BSER I/O error: {}", e),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Framing(ref e) => Display::fmt(e, f),
            Error::Utf8(ref e) => write!(f, "invalid UTF-8 in BSER string: {}", e),
        }
    }
}

impl error::Error for FramingError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            FramingError::Io(ref e) => Some(e),
            _ => None,
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Framing(ref e) => Some(e),
            Error::Utf8(ref e) => Some(e),
        }
    }
}
