//! Index structures.
//!
//! - `spgist`: per-node callbacks of the k-mer radix trie
//! - `trie`: in-memory host that stores nodes and drives the callbacks
//! - `page`: binary snapshot of a host index

pub mod page;
pub mod spgist;
pub mod trie;


pub use spgist::{Predicate, StrategyNumber};
pub use trie::{ConcurrentKmerIndex, IndexStats, KmerIndex, LeafEntry, NodeId};
