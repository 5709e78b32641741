//! BSER: the binary serialization format used by the Watchman file-watching
//! daemon for framed request/response messages.
//!
//! This crate decodes a single length-prefixed BSER envelope from a
//! blocking byte stream into an in-memory [`Value`] tree. It does not
//! encode BSER, run the Watchman protocol, or validate the decoded tree
//! against any schema — see the module docs below for what each piece
//! covers.
//!
//! ```rust
//! use bser::{Decoder, KeyOrdering, Value};
//!
//! let wire: &[u8] = &[0x00, 0x01, 0x03, 0x01, 0x08]; // a bare `true`
//! let value = Decoder::new(KeyOrdering::Unsorted).decode(wire).unwrap();
//! assert_eq!(value, Value::Bool(true));
//! ```

mod cursor;
mod decoder;
mod envelope;
mod error;
mod policy;
mod token;
mod value;

pub use decoder::{decode, decode_from, Decoder, DEFAULT_MAX_DEPTH};
pub use error::{Error, FramingError, Result};
pub use policy::KeyOrdering;
pub use value::{Object, Value};
