//! Per-branch reconstruction buffer.

use crate::kmer::{Kmer, MAX_KMER_LEN};

/// The string implied by the path from the root to the current node.
///
/// Each traversal branch owns its buffer. Handing it to a child step is an
/// explicit `clone`, so sibling branches never observe each other's writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructionBuffer {
    len: u8,
    symbols: [u8; MAX_KMER_LEN],
}

impl Default for ReconstructionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconstructionBuffer {
    /// Empty buffer for the root level.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            len: 0,
            symbols: [0; MAX_KMER_LEN],
        }
    }

    /// Buffer pre-filled with `kmer`.
    #[must_use]
    pub fn from_kmer(kmer: &Kmer) -> Self {
        let mut buffer = Self::new();
        buffer.extend_from_slice(kmer.as_bytes());
        buffer
    }

    /// Number of reconstructed symbols, i.e. the level this buffer describes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True at the root.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The reconstructed symbols.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.symbols[..self.len as usize]
    }

    /// Appends one symbol.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is already at capacity.
    pub fn push(&mut self, symbol: u8) {
        self.extend_from_slice(&[symbol]);
    }

    /// Appends `symbols`.
    ///
    /// # Panics
    ///
    /// Panics if the result would exceed [`MAX_KMER_LEN`]; a path that long
    /// means the trie is corrupt.
    pub fn extend_from_slice(&mut self, symbols: &[u8]) {
        let start = self.len as usize;
        let end = start + symbols.len();
        assert!(
            end <= MAX_KMER_LEN,
            "reconstruction overflow: {end} symbols exceed capacity {MAX_KMER_LEN}"
        );
        self.symbols[start..end].copy_from_slice(symbols);
        self.len = end as u8;
    }

    /// Copies the buffer out as a k-mer.
    #[must_use]
    pub fn to_kmer(&self) -> Kmer {
        Kmer::from_normalized(self.as_bytes())
    }
}
