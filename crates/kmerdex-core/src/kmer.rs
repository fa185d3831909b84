//! The `Kmer` key type.
//!
//! A k-mer is stored inline as an explicit length plus up to
//! [`MAX_KMER_LEN`] upper-case nucleotide bytes. The same fixed-capacity
//! representation serves as indexed key, node prefix, leaf suffix and
//! reconstructed value, so every synthetic sub-key is a cheap `Copy`.
//!
//! Borrowed views ([`KmerSlice`]) are used while a callback only reads; an
//! owned [`Kmer`] is materialised whenever a value must outlive the call.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::slice::SliceIndex;
use std::str::FromStr;

use rustc_hash::FxHasher;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::alphabet::{is_nucleotide, normalize_nucleotide};
use crate::error::{Error, Result};

/// Maximum number of symbols in an indexable k-mer.
pub const MAX_KMER_LEN: usize = 32;

/// A DNA k-mer of length `0..=32` over `{A, C, G, T}`.
#[derive(Clone, Copy)]
pub struct Kmer {
    len: u8,
    symbols: [u8; MAX_KMER_LEN],
}

impl Kmer {
    /// The zero-length k-mer.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            len: 0,
            symbols: [0; MAX_KMER_LEN],
        }
    }

    /// Builds a k-mer from raw symbols, folding lower case to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthExceeded`] for more than 32 symbols and
    /// [`Error::InvalidSymbol`] for anything outside `{A, C, G, T}`.
    pub fn new(symbols: &[u8]) -> Result<Self> {
        if symbols.len() > MAX_KMER_LEN {
            return Err(Error::LengthExceeded {
                kind: "kmer",
                len: symbols.len(),
                max: MAX_KMER_LEN,
            });
        }

        let mut kmer = Self::empty();
        for (position, &symbol) in symbols.iter().enumerate() {
            kmer.symbols[position] =
                normalize_nucleotide(symbol).ok_or_else(|| Error::InvalidSymbol {
                    kind: "kmer",
                    symbol: symbol as char,
                    position,
                })?;
        }
        kmer.len = symbols.len() as u8;
        Ok(kmer)
    }

    /// Copies already validated upper-case symbols.
    ///
    /// # Panics
    ///
    /// Panics if `symbols` is longer than [`MAX_KMER_LEN`].
    pub(crate) fn from_normalized(symbols: &[u8]) -> Self {
        assert!(
            symbols.len() <= MAX_KMER_LEN,
            "length exceeds maximum indexable size ({} > {MAX_KMER_LEN})",
            symbols.len()
        );
        debug_assert!(symbols
            .iter()
            .all(|&s| is_nucleotide(s) && s.is_ascii_uppercase()));

        let mut kmer = Self::empty();
        kmer.symbols[..symbols.len()].copy_from_slice(symbols);
        kmer.len = symbols.len() as u8;
        kmer
    }

    /// Number of symbols.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True for the zero-length k-mer.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The symbols as upper-case ASCII bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.symbols[..self.len as usize]
    }

    /// Symbol at `index`, if any.
    #[inline]
    #[must_use]
    pub fn symbol(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// Borrowed view over a range of symbols, without copying.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    #[must_use]
    pub fn slice<R>(&self, range: R) -> KmerSlice<'_>
    where
        R: SliceIndex<[u8], Output = [u8]>,
    {
        KmerSlice {
            symbols: &self.as_bytes()[range],
        }
    }

    /// Owned copy of the first `len` symbols (clamped to the k-mer length).
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self::from_normalized(&self.as_bytes()[..len.min(self.len())])
    }

    /// Owned copy of the symbols from `start` on (empty if past the end).
    #[must_use]
    pub fn suffix(&self, start: usize) -> Self {
        Self::from_normalized(&self.as_bytes()[start.min(self.len())..])
    }

    /// Exact equality: same length and same symbols.
    #[inline]
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }

    /// True if `prefix` is a prefix of this k-mer.
    #[inline]
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.as_bytes().starts_with(prefix.as_bytes())
    }

    /// Hash over the raw symbol bytes.
    #[must_use]
    pub fn hash_value(&self) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write(self.as_bytes());
        hasher.finish()
    }
}

/// True if `prefix` is a prefix of `kmer`.
#[must_use]
pub fn starts_with(prefix: &Kmer, kmer: &Kmer) -> bool {
    kmer.starts_with(prefix)
}

impl Default for Kmer {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Kmer {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Kmer {}

impl PartialOrd for Kmer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Symbol-wise over the common prefix, then the shorter k-mer first.
impl Ord for Kmer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for Kmer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for Kmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &symbol in self.as_bytes() {
            fmt::Write::write_char(f, symbol as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Kmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kmer(\"{self}\")")
    }
}

impl FromStr for Kmer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.as_bytes())
    }
}

impl TryFrom<&str> for Kmer {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl Serialize for Kmer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Kmer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Read-only view over part of a k-mer's symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmerSlice<'a> {
    symbols: &'a [u8],
}

impl<'a> KmerSlice<'a> {
    /// Number of symbols in the view.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True if the view is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The viewed symbols.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.symbols
    }

    /// First symbol of the view, if any.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<u8> {
        self.symbols.first().copied()
    }

    /// Materialises an owned k-mer.
    #[must_use]
    pub fn to_kmer(&self) -> Kmer {
        Kmer::from_normalized(self.symbols)
    }
}
