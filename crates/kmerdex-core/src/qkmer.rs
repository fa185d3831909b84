//! IUPAC query patterns (`qkmer`).
//!
//! A query pattern has the same capacity as a [`Kmer`] but is written over
//! the sixteen ambiguity codes of [`crate::alphabet`]. It is only ever a query
//! argument; the index never stores one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::alphabet::{normalize_iupac, pattern_matches};
use crate::error::{Error, Result};
use crate::kmer::{Kmer, MAX_KMER_LEN};

/// An ambiguity-coded pattern of length `0..=32`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryPattern {
    len: u8,
    codes: [u8; MAX_KMER_LEN],
}

impl QueryPattern {
    /// Builds a pattern from raw IUPAC codes, folding to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthExceeded`] for more than 32 codes and
    /// [`Error::InvalidSymbol`] for anything that is not an IUPAC code.
    pub fn new(codes: &[u8]) -> Result<Self> {
        if codes.len() > MAX_KMER_LEN {
            return Err(Error::LengthExceeded {
                kind: "qkmer",
                len: codes.len(),
                max: MAX_KMER_LEN,
            });
        }

        let mut pattern = Self {
            len: codes.len() as u8,
            codes: [0; MAX_KMER_LEN],
        };
        for (position, &code) in codes.iter().enumerate() {
            pattern.codes[position] = normalize_iupac(code).ok_or_else(|| Error::InvalidSymbol {
                kind: "qkmer",
                symbol: code as char,
                position,
            })?;
        }
        Ok(pattern)
    }

    /// Number of codes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True for the zero-length pattern.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The codes as upper-case ASCII bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.codes[..self.len as usize]
    }

    /// Code at `index`, if any.
    #[inline]
    #[must_use]
    pub fn symbol(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// True if every symbol of `partial` is allowed by the code at the same
    /// position. Only the overlap is compared; lengths are not checked.
    #[must_use]
    pub fn matches_prefix(&self, partial: &[u8]) -> bool {
        self.matches_prefix_from(partial, 0)
    }

    /// Like [`matches_prefix`](Self::matches_prefix), skipping the first
    /// `from` positions of both sides.
    #[must_use]
    pub fn matches_prefix_from(&self, partial: &[u8], from: usize) -> bool {
        let codes = self.as_bytes();
        if from >= codes.len().min(partial.len()) {
            return true;
        }
        codes[from..]
            .iter()
            .zip(&partial[from..])
            .all(|(&code, &symbol)| pattern_matches(code, symbol))
    }

    /// Full match: same length as `kmer` and every position allowed.
    #[must_use]
    pub fn matches(&self, kmer: &Kmer) -> bool {
        self.len() == kmer.len() && self.matches_prefix(kmer.as_bytes())
    }
}

/// True if `kmer` matches `pattern` position by position over equal lengths.
#[must_use]
pub fn contains(pattern: &QueryPattern, kmer: &Kmer) -> bool {
    pattern.matches(kmer)
}

impl fmt::Display for QueryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &code in self.as_bytes() {
            fmt::Write::write_char(f, code as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for QueryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueryPattern(\"{self}\")")
    }
}

impl FromStr for QueryPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.as_bytes())
    }
}

impl Serialize for QueryPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QueryPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
