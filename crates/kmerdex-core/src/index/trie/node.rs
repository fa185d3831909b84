//! Arena node types.

use std::fmt;

use crate::index::spgist::{InnerNodeView, NodeLabel};
use crate::kmer::Kmer;

/// Handle of a node in the index arena.
///
/// Handles are stable: a node rewrite replaces the content behind a handle
/// and never moves it, so parents keep pointing at the right slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw handle value, as written in snapshots.
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One indexed key below its path, with the host row it points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafEntry {
    /// Key symbols not covered by the ancestors' prefixes and labels.
    pub suffix: Kmer,
    /// Row identifier.
    pub row: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InnerNode {
    pub(crate) prefix: Option<Kmer>,
    pub(crate) labels: Vec<NodeLabel>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) all_the_same: bool,
}

impl InnerNode {
    pub(crate) fn view(&self) -> InnerNodeView<'_> {
        InnerNodeView {
            prefix: self.prefix.as_ref(),
            labels: &self.labels,
            all_the_same: self.all_the_same,
        }
    }

    pub(crate) fn prefix_len(&self) -> usize {
        self.prefix.map_or(0, |p| p.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Inner(InnerNode),
    Leaf(Vec<LeafEntry>),
}

impl Node {
    pub(crate) fn empty_leaf() -> Self {
        Self::Leaf(Vec::new())
    }
}
