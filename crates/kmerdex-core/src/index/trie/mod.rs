//! Reference host for the trie callbacks.
//!
//! An arena of nodes addressed by [`NodeId`]. Inner nodes hold an optional
//! prefix and one child per label; leaf pages hold key suffixes and row ids.
//! Pages split with `pick_split` once they exceed the configured capacity.

mod concurrent;
mod index;
mod node;

pub use concurrent::ConcurrentKmerIndex;
pub use index::{IndexStats, KmerIndex};
pub use node::{LeafEntry, NodeId};
pub(crate) use node::{InnerNode, Node};
