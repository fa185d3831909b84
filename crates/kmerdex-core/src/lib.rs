//! # `kmerdex` Core
//!
//! Radix-trie index for DNA k-mers.
//!
//! Keys are nucleotide strings of up to 32 symbols. Inner nodes store the
//! prefix shared by their subtree and branch on the next symbol; leaves keep
//! only what is left of each key. Lookups visit each key symbol at most once.
//!
//! ## Features
//!
//! - **Exact match**: `kmer = 'ACGT'`
//! - **Prefix match**: all k-mers starting with a given one
//! - **Pattern match**: IUPAC ambiguity codes (`N`, `W`, `R`, ...) per position
//! - **Snapshots**: compact binary image, validated on load
//!
//! ## Quick Start
//!
//! ```rust
//! use kmerdex_core::{DnaSequence, KmerIndex, Predicate};
//!
//! let sequence: DnaSequence = "ACGTACGTTA".parse()?;
//! let mut index = KmerIndex::new();
//! for (row, kmer) in sequence.kmers(4)?.enumerate() {
//!     index.insert(kmer, row as u32);
//! }
//!
//! let rows = index.search(&[Predicate::StartsWith("ACG".parse()?)]);
//! assert_eq!(rows.len(), 2);
//! # Ok::<(), kmerdex_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
// =============================================================================
// NUMERIC CAST LINTS
// =============================================================================
// Lengths are bounded by MAX_KMER_LEN (32) and row ids are u32, so `as`
// between usize/u8/u32 cannot truncate on the paths that use it.
// =============================================================================
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
// =============================================================================
// STYLISTIC LINTS - Safe to allow globally (no bug risk)
// =============================================================================
#![allow(clippy::option_if_let_else)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::redundant_pub_crate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::manual_assert)]

pub mod alphabet;
pub mod codec;
pub mod config;
pub mod dna;
pub mod error;
pub mod index;
pub mod kmer;
pub mod qkmer;

pub use config::{ConfigError, IndexConfig, KmerdexConfig, LoggingConfig};
pub use dna::{DnaSequence, KmerWindows};
pub use error::{Error, Result};
pub use index::spgist::{configure, SpgConfig};
pub use index::{
    ConcurrentKmerIndex, IndexStats, KmerIndex, LeafEntry, NodeId, Predicate, StrategyNumber,
};
pub use kmer::{starts_with, Kmer, KmerSlice, MAX_KMER_LEN};
pub use qkmer::{contains, QueryPattern};
