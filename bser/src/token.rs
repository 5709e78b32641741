//! BSER wire tokens: the envelope magic and the type-tag tables from §4 and §6.2.

/// First two bytes of every BSER envelope.
pub const MAGIC: [u8; 2] = [0x00, 0x01];

/// Length-type tags, valid both as the envelope's LTYPE byte and as the
/// tag introducing any interior length prefix (array/object/string counts).
pub const LEN_INT8: u8 = 0x03;
pub const LEN_INT16: u8 = 0x04;
pub const LEN_INT32: u8 = 0x05;
pub const LEN_INT64: u8 = 0x06;

/// Value type tags, dispatched on by the recursive-descent value parser.
pub const TAG_ARRAY: u8 = 0x00;
pub const TAG_OBJECT: u8 = 0x01;
pub const TAG_STRING: u8 = 0x02;
pub const TAG_INT8: u8 = 0x03;
pub const TAG_INT16: u8 = 0x04;
pub const TAG_INT32: u8 = 0x05;
pub const TAG_INT64: u8 = 0x06;
pub const TAG_REAL: u8 = 0x07;
pub const TAG_TRUE: u8 = 0x08;
pub const TAG_FALSE: u8 = 0x09;
pub const TAG_NULL: u8 = 0x0A;

/// Returns the byte width of the length field selected by a length-type tag,
/// or `None` if the tag is not one of the four recognized widths.
pub fn length_width(tag: u8) -> Option<usize> {
    match tag {
        LEN_INT8 => Some(1),
        LEN_INT16 => Some(2),
        LEN_INT32 => Some(4),
        LEN_INT64 => Some(8),
        _ => None,
    }
}

/// Decodes `width` bytes (1, 2, 4, or 8) of `bytes` as a signed integer in
/// the host's native byte order (§6.1: BSER integers are native-endian to
/// the producer; this decoder assumes producer and consumer share
/// endianness). `bytes` must hold exactly `width` bytes.
pub fn decode_signed(width: usize, bytes: &[u8]) -> i64 {
    match width {
        1 => bytes[0] as i8 as i64,
        2 => i16::from_ne_bytes([bytes[0], bytes[1]]) as i64,
        4 => i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64,
        8 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(bytes);
            i64::from_ne_bytes(buf)
        }
        _ => unreachable!("length_width only returns 1, 2, 4, or 8"),
    }
}
