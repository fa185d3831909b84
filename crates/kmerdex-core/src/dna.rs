//! Arbitrary-length DNA sequences and their sliding-window k-mers.

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use crate::alphabet::normalize_nucleotide;
use crate::error::{Error, Result};
use crate::kmer::{Kmer, MAX_KMER_LEN};

/// A validated, upper-case DNA sequence of any length.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct DnaSequence {
    symbols: Vec<u8>,
}

impl DnaSequence {
    /// Builds a sequence from raw symbols, folding to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSymbol`] for anything outside `{A, C, G, T}`.
    pub fn new(symbols: &[u8]) -> Result<Self> {
        let symbols = symbols
            .iter()
            .enumerate()
            .map(|(position, &symbol)| {
                normalize_nucleotide(symbol).ok_or_else(|| Error::InvalidSymbol {
                    kind: "dna",
                    symbol: symbol as char,
                    position,
                })
            })
            .collect::<Result<Vec<u8>>>()?;
        Ok(Self { symbols })
    }

    /// Number of nucleotides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True for the empty sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The nucleotides as upper-case ASCII bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.symbols
    }

    /// Every length-`k` window of the sequence, left to right.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidK`] unless `1 <= k <= min(len, 32)`.
    pub fn kmers(&self, k: usize) -> Result<KmerWindows<'_>> {
        if k == 0 || k > MAX_KMER_LEN || k > self.symbols.len() {
            return Err(Error::InvalidK {
                k,
                sequence_len: self.symbols.len(),
            });
        }
        Ok(KmerWindows {
            windows: self.symbols.windows(k),
        })
    }
}

impl fmt::Display for DnaSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &symbol in &self.symbols {
            fmt::Write::write_char(f, symbol as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DnaSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DnaSequence(len={})", self.symbols.len())
    }
}

impl FromStr for DnaSequence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.as_bytes())
    }
}

/// Iterator over the k-mers of a [`DnaSequence`].
#[derive(Debug, Clone)]
pub struct KmerWindows<'a> {
    windows: std::slice::Windows<'a, u8>,
}

impl Iterator for KmerWindows<'_> {
    type Item = Kmer;

    fn next(&mut self) -> Option<Kmer> {
        self.windows.next().map(Kmer::from_normalized)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.windows.size_hint()
    }
}

impl ExactSizeIterator for KmerWindows<'_> {}

impl FusedIterator for KmerWindows<'_> {}
