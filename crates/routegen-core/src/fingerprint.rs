//! Stable content fingerprints for cache keys.
//!
//! [`Fingerprint`] is a 64-bit XXHash64 digest. Unlike `std::hash::Hash` with the
//! default hasher, the value is identical across processes and hosts, so it can key
//! caches that outlive a single run.
//!
//! Every field written through [`FingerprintBuilder`] is length-prefixed and tagged,
//! which keeps `("ab", "c")` and `("a", "bc")` distinct.
//!
//! # Examples
//!
//! ```
//! use routegen_core::{Fingerprint, FingerprintBuilder};
//!
//! let a = Fingerprint::of_str("class A {}");
//! let b = Fingerprint::of_str("class A {}");
//! assert_eq!(a, b);
//!
//! let mut builder = FingerprintBuilder::new();
//! builder.str("App").str("Startup");
//! assert_ne!(builder.finish(), Fingerprint::of_str("AppStartup"));
//! ```

use std::fmt;

use xxhash_rust::xxh64::{Xxh64, xxh64};

/// Domain markers mixed into the stream so different record kinds never collide.
pub mod markers {
    /// Marker preceding a string field.
    pub const STR: u8 = 0x01;
    /// Marker preceding an integer field.
    pub const U64: u8 = 0x02;
    /// Marker opening a sequence.
    pub const SEQ_START: u8 = 0x03;
    /// Marker closing a sequence.
    pub const SEQ_END: u8 = 0x04;
    /// Marker preceding a nested fingerprint.
    pub const NESTED: u8 = 0x05;
    /// Marker preceding a tag byte.
    pub const TAG: u8 = 0x06;
}

/// A deterministic 64-bit digest of some content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    /// The fingerprint of nothing.
    pub const EMPTY: Fingerprint = Fingerprint(0);

    /// Fingerprint raw text.
    #[inline]
    pub fn of_str(text: &str) -> Self {
        Fingerprint(xxh64(text.as_bytes(), 0))
    }

    /// Get the raw digest.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:016x})", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Streaming builder for structured fingerprints.
pub struct FingerprintBuilder {
    hasher: Xxh64,
}

impl FingerprintBuilder {
    /// Start a new fingerprint.
    pub fn new() -> Self {
        Self {
            hasher: Xxh64::new(0),
        }
    }

    /// Write a string field.
    pub fn str(&mut self, value: &str) -> &mut Self {
        self.hasher.update(&[markers::STR]);
        self.hasher.update(&(value.len() as u64).to_le_bytes());
        self.hasher.update(value.as_bytes());
        self
    }

    /// Write an integer field.
    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.hasher.update(&[markers::U64]);
        self.hasher.update(&value.to_le_bytes());
        self
    }

    /// Write a one-byte tag distinguishing record kinds.
    pub fn tag(&mut self, tag: u8) -> &mut Self {
        self.hasher.update(&[markers::TAG, tag]);
        self
    }

    /// Write a sequence of strings, preserving order.
    pub fn strs<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.hasher.update(&[markers::SEQ_START]);
        for value in values {
            self.str(value.as_ref());
        }
        self.hasher.update(&[markers::SEQ_END]);
        self
    }

    /// Fold in another fingerprint.
    pub fn fingerprint(&mut self, value: Fingerprint) -> &mut Self {
        self.hasher.update(&[markers::NESTED]);
        self.hasher.update(&value.0.to_le_bytes());
        self
    }

    /// Finish and return the digest.
    pub fn finish(&self) -> Fingerprint {
        Fingerprint(self.hasher.digest())
    }
}

impl Default for FingerprintBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_str_is_deterministic() {
        assert_eq!(Fingerprint::of_str("abc"), Fingerprint::of_str("abc"));
        assert_ne!(Fingerprint::of_str("abc"), Fingerprint::of_str("abd"));
    }

    #[test]
    fn field_boundaries_matter() {
        let mut left = FingerprintBuilder::new();
        left.str("ab").str("c");
        let mut right = FingerprintBuilder::new();
        right.str("a").str("bc");
        assert_ne!(left.finish(), right.finish());
    }

    #[test]
    fn sequence_order_matters() {
        let mut forward = FingerprintBuilder::new();
        forward.strs(["int", "string"]);
        let mut reversed = FingerprintBuilder::new();
        reversed.strs(["string", "int"]);
        assert_ne!(forward.finish(), reversed.finish());
    }

    #[test]
    fn empty_sequence_differs_from_no_sequence() {
        let mut with_seq = FingerprintBuilder::new();
        with_seq.str("A").strs(Vec::<String>::new());
        let mut without = FingerprintBuilder::new();
        without.str("A");
        assert_ne!(with_seq.finish(), without.finish());
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Fingerprint(0xff).to_string(), "00000000000000ff");
    }
}
