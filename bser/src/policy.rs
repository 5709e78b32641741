//! Key-ordering policy for decoded objects (§3.2, §4.4).

/// Controls how a decoded `Value::Object`'s entries iterate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrdering {
    /// Preserve the order keys appear on the wire.
    Unsorted,
    /// Present keys in ascending lexicographic order of their UTF-8 bytes.
    Sorted,
}

impl Default for KeyOrdering {
    /// `Unsorted` mirrors the wire's own order, the natural "no policy
    /// applied" default for a decoder that otherwise takes no configuration.
    fn default() -> Self {
        KeyOrdering::Unsorted
    }
}
