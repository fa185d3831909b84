//! Shared, lock-protected index.

use parking_lot::RwLock;
use roaring::RoaringBitmap;

use crate::config::IndexConfig;
use crate::error::Result;
use crate::index::spgist::Predicate;
use crate::kmer::Kmer;

use super::index::{IndexStats, KmerIndex};

/// Thread-safe wrapper for [`KmerIndex`]: searches share a read lock,
/// inserts take the write lock.
#[derive(Debug, Default)]
pub struct ConcurrentKmerIndex {
    inner: RwLock<KmerIndex>,
}

impl ConcurrentKmerIndex {
    /// Create an empty concurrent index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty concurrent index with the given page budget.
    ///
    /// # Errors
    ///
    /// Returns an error if a knob is out of range.
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        Ok(Self::from(KmerIndex::with_config(config)?))
    }

    /// Insert a key (write lock).
    pub fn insert(&self, kmer: Kmer, row: u32) {
        self.inner.write().insert(kmer, row);
    }

    /// Search for rows (read lock).
    #[must_use]
    pub fn search(&self, queries: &[Predicate]) -> RoaringBitmap {
        self.inner.read().search(queries)
    }

    /// Entry count (read lock).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// True if nothing is indexed (read lock).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Index shape (read lock).
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        self.inner.read().stats()
    }

    /// Unwraps the index.
    #[must_use]
    pub fn into_inner(self) -> KmerIndex {
        self.inner.into_inner()
    }
}

impl From<KmerIndex> for ConcurrentKmerIndex {
    fn from(index: KmerIndex) -> Self {
        Self {
            inner: RwLock::new(index),
        }
    }
}
