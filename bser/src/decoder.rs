
//! BSER decoder (§2, §4).

use std::io::Read;

use log::{debug, trace};

use crate::cursor::BodyCursor;
use crate::envelope;
use crate::error::{Error, FramingError, Result};
use crate::policy::KeyOrdering;
use crate::token;
use crate::value::{Object, Value};

/// Default recursion limit for nested arrays/objects (§9: BSER permits
/// arbitrary nesting; this bounds the recursive descent rather than
/// leaving the call stack unbounded). Generous enough for any realistic
/// Watchman response; override with `Decoder::with_max_depth`.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Decodes one BSER envelope from `reader` using the default
/// `Unsorted` key-ordering policy.
///
/// ```rust
/// use bser::{decode, Value};
///
/// let wire: &[u8] = &[0x00, 0x01, 0x03, 0x01, 0x08]; // true
/// assert_eq!(decode(wire).unwrap(), Value::Bool(true));
/// ```
pub fn decode<R: Read>(reader: R) -> Result<Value> {
    Decoder::default().decode(reader)
}

/// Decodes one BSER envelope from `reader` using an explicit policy.
pub fn decode_from<R: Read>(reader: R, policy: KeyOrdering) -> Result<Value> {
    Decoder::new(policy).decode(reader)
}

/// A BSER decoder, configured with a single parameter: the key-ordering
/// policy (§6.3). The decoder holds no state between calls (§3.4) — each
/// call to `decode` reads exactly one envelope and returns.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    policy: KeyOrdering,
    max_depth: usize,
}

impl Decoder {
    /// Constructs a decoder with the given key-ordering policy.
    pub fn new(policy: KeyOrdering) -> Decoder {
        Decoder {
            policy,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Overrides the recursion depth limit (§9). Not part of the wire
    /// contract; purely a local hardening knob.
    pub fn with_max_depth(mut self, max_depth: usize) -> Decoder {
        self.max_depth = max_depth;
        self
    }

    /// Reads one envelope from `reader` and returns the decoded value tree.
    pub fn decode<R: Read>(&self, mut reader: R) -> Result<Value> {
        let env = envelope::read_envelope(&mut reader).map_err(|e| {
            debug!("BSER envelope rejected: {}", e);
            e
        })?;
        trace!(
            "BSER envelope: length_width={} body_length={}",
            env.length_width,
            env.body_length
        );

        let body = envelope::read_body(&mut reader, env.body_length)?;
        let mut cursor = BodyCursor::new(&body);

        let value = self.parse_value(&mut cursor, 0).map_err(|e| {
            debug!("BSER body rejected: {}", e);
            e
        })?;

        if cursor.position() != body.len() {
            return Err(FramingError::ValueTruncated {
                expected: body.len(),
                got: cursor.position(),
            }
            .into());
        }

        Ok(value)
    }

    fn parse_value(&self, cursor: &mut BodyCursor, depth: usize) -> Result<Value> {
        if depth > self.max_depth {
            return Err(FramingError::NestingTooDeep {
                limit: self.max_depth,
            }
            .into());
        }

        let tag = cursor.read_u8()?;
        match tag {
            token::TAG_NULL => Ok(Value::Null),
            token::TAG_TRUE => Ok(Value::Bool(true)),
            token::TAG_FALSE => Ok(Value::Bool(false)),
            token::TAG_INT8 => {
                let bytes = cursor.read_bytes(1)?;
                Ok(Value::Int8(bytes[0] as i8))
            }
            token::TAG_INT16 => {
                let bytes = cursor.read_bytes(2)?;
                Ok(Value::Int16(i16::from_ne_bytes([bytes[0], bytes[1]])))
            }
            token::TAG_INT32 => {
                let bytes = cursor.read_bytes(4)?;
                Ok(Value::Int32(i32::from_ne_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3],
                ])))
            }
            token::TAG_INT64 => {
                let bytes = cursor.read_bytes(8)?;
                let mut buf = [0u8; 8];
                buf.copy_from_slice(bytes);
                Ok(Value::Int64(i64::from_ne_bytes(buf)))
            }
            token::TAG_REAL => {
                let bytes = cursor.read_bytes(8)?;
                let mut buf = [0u8; 8];
                buf.copy_from_slice(bytes);
                Ok(Value::Real(f64::from_ne_bytes(buf)))
            }
            token::TAG_STRING => self.decode_string(cursor),
            token::TAG_ARRAY => self.decode_array(cursor, depth),
            token::TAG_OBJECT => self.decode_object(cursor, depth),
            other => Err(FramingError::UnrecognizedValueType(other).into()),
        }
    }

    /// Decodes a String payload. Assumes the `0x02` type tag has already
    /// been consumed by the caller.
    fn decode_string(&self, cursor: &mut BodyCursor) -> Result<Value> {
        let len = cursor.read_length()? as usize;
        if len > cursor.remaining() {
            return Err(FramingError::ValueTruncated {
                expected: len,
                got: cursor.remaining(),
            }
            .into());
        }
        let bytes = cursor.read_bytes(len)?;
        let s = std::str::from_utf8(bytes)?;
        Ok(Value::String(s.to_string()))
    }

    /// Decodes an Array payload. Assumes the `0x00` type tag has already
    /// been consumed by the caller.
    fn decode_array(&self, cursor: &mut BodyCursor, depth: usize) -> Result<Value> {
        let len = cursor.read_length()? as usize;
        // Bound the eager allocation by what could plausibly fit: every
        // element needs at least one tag byte, so `remaining()` is a safe
        // upper bound regardless of how large `len` claims to be.
        let mut items = Vec::with_capacity(len.min(cursor.remaining()));
        for _ in 0..len {
            items.push(self.parse_value(cursor, depth + 1)?);
        }
        Ok(Value::Array(items))
    }

    /// Decodes an Object payload. Assumes the `0x01` type tag has already
    /// been consumed by the caller.
    fn decode_object(&self, cursor: &mut BodyCursor, depth: usize) -> Result<Value> {
        let len = cursor.read_length()? as usize;
        let mut entries: Vec<(String, Value)> = Vec::with_capacity(len.min(cursor.remaining()));

        for _ in 0..len {
            let key_tag = cursor.read_u8()?;
            if key_tag != token::TAG_STRING {
                return Err(FramingError::UnrecognizedObjectKeyType(key_tag).into());
            }
            let key = match self.decode_string(cursor)? {
                Value::String(s) => s,
                _ => unreachable!("decode_string always returns Value::String"),
            };
            let value = self.parse_value(cursor, depth + 1)?;
            entries.push((key, value));
        }

        if self.policy == KeyOrdering::Sorted {
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
        }

        let mut map = Object::with_capacity(entries.len());
        for (key, value) in entries {
            // IndexMap::insert on a repeated key keeps the first
            // position but overwrites the value — last-write-wins on
            // value, first-write-wins on position (§3.2, §9: duplicate
            // keys are not specified; this is the container's native
            // behavior, documented rather than worked around).
            map.insert(key, value);
        }

        Ok(Value::Object(map))
    }
}

impl Default for Decoder {
    fn default() -> Decoder {
        Decoder::new(KeyOrdering::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn decode_unsorted(bytes: &[u8]) -> Result<Value> {
        Decoder::new(KeyOrdering::Unsorted).decode(bytes)
    }

    fn decode_sorted(bytes: &[u8]) -> Result<Value> {
        Decoder::new(KeyOrdering::Sorted).decode(bytes)
    }

    /// Scenario 1 (spec §8.2): array of three Int8.
    #[test]
    fn array_of_int8() {
        let wire = [
            0x00, 0x01, 0x03, 0x09, 0x00, 0x03, 0x03, 0x03, 0x23, 0x03, 0x42, 0x03, 0xF0u8,
        ];
        let value = decode_unsorted(&wire).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Int8(0x23),
                Value::Int8(0x42),
                Value::Int8(0xF0u8 as i8),
            ])
        );
    }

    /// Scenario 2: string "hello world".
    #[test]
    fn string_value() {
        let mut wire = vec![0x00, 0x01, 0x03, 0x0E, 0x02, 0x03, 0x0B];
        wire.extend_from_slice(b"hello world");
        let value = decode_unsorted(&wire).unwrap();
        assert_eq!(value, Value::String("hello world".to_string()));
    }

    /// Scenario 3: unsorted vs. sorted object key order.
    #[test]
    fn object_key_ordering() {
        let mut wire = vec![0x00, 0x01, 0x03, 0x1B, 0x01, 0x03, 0x03];
        for (key, val) in [("foo", 0x23u8), ("bar", 0x42), ("baz", 0xF0)] {
            wire.push(0x02);
            wire.push(0x03);
            wire.push(key.len() as u8);
            wire.extend_from_slice(key.as_bytes());
            wire.push(0x03);
            wire.push(val);
        }

        let unsorted = decode_unsorted(&wire).unwrap();
        let object = unsorted.as_object().unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["foo", "bar", "baz"]);

        let sorted = decode_sorted(&wire).unwrap();
        let object = sorted.as_object().unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["bar", "baz", "foo"]);
    }

    /// Scenario 4: Int64.
    #[test]
    fn int64_value() {
        let wire: [u8; 13] = [
            0x00, 0x01, 0x03, 0x09, 0x06, 0xFF, 0xEE, 0xDD, 0xCC, 0x44, 0x33, 0x22, 0x11,
        ];
        let value = decode_unsorted(&wire).unwrap();
        assert_eq!(value, Value::Int64(0x11223344CCDDEEFFu64 as i64));
    }

    /// Scenario 5: IEEE-754 double.
    #[test]
    fn real_value() {
        let wire: [u8; 13] = [
            0x00, 0x01, 0x03, 0x09, 0x07, 0x5F, 0x63, 0x39, 0x37, 0xDD, 0x9A, 0xBF, 0x3F,
        ];
        let value = decode_unsorted(&wire).unwrap();
        match value {
            Value::Real(v) => assert!((v - 0.123456789).abs() < 1e-6),
            other => panic!("expected Value::Real, got {:?}", other),
        }
    }

    /// Scenario 6: truncated envelope on empty input.
    #[test]
    fn empty_input_is_truncated_header() {
        let err = decode_unsorted(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid BSER header (expected 3 bytes, got 0 bytes)"
        );
    }

    /// Scenario 7: bad magic.
    #[test]
    fn bad_magic_is_rejected() {
        let err = decode_unsorted(&[0x00, 0x0F, 0x03]).unwrap_err();
        assert!(err.to_string().starts_with("Invalid BSER header"));
    }

    /// Scenario 11: invalid UTF-8 string payload is a character-coding error.
    #[test]
    fn invalid_utf8_is_a_character_coding_error() {
        let wire = [0x00, 0x01, 0x03, 0x06, 0x02, 0x03, 0x03, 0xAB, 0xCD, 0xEF];
        let err = decode_unsorted(&wire).unwrap_err();
        assert!(matches!(err, Error::Utf8(_)));
    }

    /// Scenario 12: object key with a non-string type tag.
    #[test]
    fn non_string_object_key_is_rejected() {
        let wire = [
            0x00, 0x01, 0x03, 0x07, 0x01, 0x03, 0x01, 0x03, 0x03, 0x03, 0x23,
        ];
        let err = decode_unsorted(&wire).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unrecognized BSER object key type 3, expected string"
        );
    }

    /// Scenario 13: array declares more elements than the body holds.
    #[test]
    fn truncated_array_payload() {
        // Body declares an array of 3 elements but the body itself ends
        // right after the length prefix, with no elements present.
        let wire = [0x00, 0x01, 0x03, 0x04, 0x00, 0x03, 0x03, 0x03];
        assert!(decode_unsorted(&wire).is_err());
    }

    #[test]
    fn rejects_nesting_past_the_depth_limit() {
        // Build 3 levels of nested single-element arrays around an Int8.
        let mut nested = vec![token::TAG_INT8, 0x2A];
        for _ in 0..3 {
            let mut wrapped = vec![token::TAG_ARRAY, 0x03, 0x01];
            wrapped.extend_from_slice(&nested);
            nested = wrapped;
        }

        let mut wire = vec![0x00, 0x01, 0x05];
        wire.extend_from_slice(&(nested.len() as i32).to_ne_bytes());
        wire.extend_from_slice(&nested);

        let decoder = Decoder::new(KeyOrdering::Unsorted).with_max_depth(2);
        let err = decoder.decode(wire.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            Error::Framing(FramingError::NestingTooDeep { .. })
        ));
    }
}
