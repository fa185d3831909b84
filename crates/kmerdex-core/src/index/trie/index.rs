//! In-memory k-mer trie driven by the callbacks in [`crate::index::spgist`].
//!
//! Plays the part of the host engine: it owns the node arena, applies the
//! structural decisions returned by `choose` and `pick_split`, and walks the
//! tree with the consistency evaluators.

use roaring::RoaringBitmap;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::index::spgist::{
    choose, inner_consistent, leaf_consistent, pick_split, ChooseResult, InnerConsistentIn,
    LeafConsistentIn, Predicate, ReconstructionBuffer, SplitTuple,
};
use crate::kmer::{Kmer, MAX_KMER_LEN};

use super::node::{InnerNode, LeafEntry, Node, NodeId};

/// Shape of the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Number of inner nodes.
    pub inner_nodes: usize,
    /// Number of leaf pages.
    pub leaf_pages: usize,
    /// Number of indexed keys.
    pub leaf_entries: usize,
    /// Nodes on the longest root-to-leaf path.
    pub max_depth: usize,
    /// Inner nodes flagged as uniform.
    pub all_the_same_nodes: usize,
}

/// Radix trie over k-mers mapping keys to `u32` row ids.
///
/// Duplicate keys are allowed; each insert adds one entry.
#[derive(Debug, Clone)]
pub struct KmerIndex {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) config: IndexConfig,
    pub(crate) len: usize,
}

impl Default for KmerIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl KmerIndex {
    /// Creates an empty index with the default page budget.
    #[must_use]
    pub fn new() -> Self {
        Self::with_validated(IndexConfig::default())
    }

    /// Creates an empty index with the given page budget.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a knob is out of range.
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_validated(config))
    }

    pub(crate) fn with_validated(config: IndexConfig) -> Self {
        Self {
            nodes: vec![Node::empty_leaf()],
            root: NodeId(0),
            config,
            len: 0,
        }
    }

    /// Builds an index in one pass: every entry goes into a single root page,
    /// which is then split until all pages fit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a knob is out of range.
    pub fn bulk_load<I>(config: IndexConfig, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Kmer, u32)>,
    {
        let mut index = Self::with_config(config)?;
        let page: Vec<LeafEntry> = entries
            .into_iter()
            .map(|(suffix, row)| LeafEntry { suffix, row })
            .collect();
        index.len = page.len();
        index.nodes[index.root.index()] = Node::Leaf(page);
        index.split_overfull(index.root, 0);

        info!(
            entries = index.len,
            nodes = index.nodes.len(),
            "Bulk load complete"
        );
        Ok(index)
    }

    /// Page budget in use.
    #[must_use]
    pub fn config(&self) -> IndexConfig {
        self.config
    }

    /// Number of indexed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Inserts one key.
    pub fn insert(&mut self, kmer: Kmer, row: u32) {
        let mut id = self.root;
        let mut level = 0;

        loop {
            let decision = match &self.nodes[id.index()] {
                Node::Leaf(_) => break,
                Node::Inner(inner) => match choose(&kmer, level, &inner.view()) {
                    ChooseResult::MatchNode {
                        node_index,
                        level_add,
                        ..
                    } => {
                        id = inner.children[node_index];
                        level += level_add;
                        continue;
                    }
                    other => other,
                },
            };

            match decision {
                ChooseResult::AddNode { label, insert_at } => {
                    let leaf = self.alloc(Node::empty_leaf());
                    if let Node::Inner(inner) = &mut self.nodes[id.index()] {
                        inner.labels.insert(insert_at, label);
                        inner.children.insert(insert_at, leaf);
                    }
                    debug!(node = %id, %label, insert_at, "Added child");
                }
                ChooseResult::SplitTuple(split) => self.split_tuple(id, split),
                ChooseResult::MatchNode { .. } => {}
            }
        }

        if let Node::Leaf(entries) = &mut self.nodes[id.index()] {
            entries.push(LeafEntry {
                suffix: kmer.suffix(level),
                row,
            });
        }
        self.len += 1;
        self.split_overfull(id, level);
    }

    /// Row ids of every entry satisfying all `queries`. No queries means all
    /// rows.
    #[must_use]
    pub fn search(&self, queries: &[Predicate]) -> RoaringBitmap {
        let mut rows = RoaringBitmap::new();
        self.scan(queries, |_, row| {
            rows.insert(row);
        });
        rows
    }

    /// Like [`search`](Self::search), returning each matching key with its
    /// row id.
    #[must_use]
    pub fn search_entries(&self, queries: &[Predicate]) -> Vec<(Kmer, u32)> {
        let mut out = Vec::new();
        self.scan(queries, |kmer, row| out.push((kmer, row)));
        out
    }

    /// Collects node and entry counts.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats::default();
        let mut stack = vec![(self.root, 1usize)];

        while let Some((id, depth)) = stack.pop() {
            stats.max_depth = stats.max_depth.max(depth);
            match &self.nodes[id.index()] {
                Node::Inner(inner) => {
                    stats.inner_nodes += 1;
                    if inner.all_the_same {
                        stats.all_the_same_nodes += 1;
                    }
                    stack.extend(inner.children.iter().map(|&child| (child, depth + 1)));
                }
                Node::Leaf(entries) => {
                    stats.leaf_pages += 1;
                    stats.leaf_entries += entries.len();
                }
            }
        }
        stats
    }

    /// Walks the arena and reports the first structural violation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] for a node with zero, unsorted or
    /// duplicate labels (including a second `Stop`), a label/child count
    /// mismatch, a dangling or shared handle, an unreachable node, a path
    /// longer than a k-mer, or an entry count that disagrees with `len`.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = vec![false; self.nodes.len()];
        let mut entries = 0usize;
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, level)) = stack.pop() {
            let Some(node) = self.nodes.get(id.index()) else {
                return Err(Error::Internal(format!("dangling node handle {id}")));
            };
            if std::mem::replace(&mut seen[id.index()], true) {
                return Err(Error::Internal(format!("node {id} is reachable twice")));
            }

            match node {
                Node::Inner(inner) => {
                    if inner.labels.is_empty() {
                        return Err(Error::Internal(format!("inner node {id} has zero labels")));
                    }
                    if inner.labels.len() != inner.children.len() {
                        return Err(Error::Internal(format!(
                            "inner node {id} has {} labels but {} children",
                            inner.labels.len(),
                            inner.children.len()
                        )));
                    }
                    if !inner.labels.windows(2).all(|w| w[0] < w[1]) {
                        return Err(Error::Internal(format!(
                            "inner node {id} labels are unsorted or duplicated: {:?}",
                            inner.labels
                        )));
                    }
                    let base = level + inner.prefix_len();
                    if base > MAX_KMER_LEN {
                        return Err(Error::Internal(format!(
                            "inner node {id} path length {base} exceeds {MAX_KMER_LEN}"
                        )));
                    }
                    for (label, &child) in inner.labels.iter().zip(&inner.children) {
                        let child_level = base + usize::from(!label.is_dummy());
                        if child_level > MAX_KMER_LEN {
                            return Err(Error::Internal(format!(
                                "child {child} of {id} path length {child_level} exceeds {MAX_KMER_LEN}"
                            )));
                        }
                        stack.push((child, child_level));
                    }
                }
                Node::Leaf(page) => {
                    if let Some(entry) = page.iter().find(|e| level + e.suffix.len() > MAX_KMER_LEN) {
                        return Err(Error::Internal(format!(
                            "leaf {id} entry for row {} is longer than {MAX_KMER_LEN}",
                            entry.row
                        )));
                    }
                    entries += page.len();
                }
            }
        }

        if let Some(orphan) = seen.iter().position(|&s| !s) {
            return Err(Error::Internal(format!(
                "node #{orphan} is unreachable from the root"
            )));
        }
        if entries != self.len {
            return Err(Error::Internal(format!(
                "found {entries} leaf entries, expected {}",
                self.len
            )));
        }
        Ok(())
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Rewrites `id` as the upper node of `split` and moves its old content
    /// under the designated child slot.
    fn split_tuple(&mut self, id: NodeId, split: SplitTuple) {
        let upper = InnerNode {
            prefix: split.prefix_prefix,
            labels: split.prefix_labels,
            children: Vec::new(),
            all_the_same: false,
        };
        let lower = match std::mem::replace(&mut self.nodes[id.index()], Node::Inner(upper)) {
            Node::Inner(mut inner) => {
                inner.prefix = split.postfix_prefix;
                Node::Inner(inner)
            }
            leaf @ Node::Leaf(_) => leaf,
        };
        let moved = self.alloc(lower);

        let slots = match &self.nodes[id.index()] {
            Node::Inner(upper) => upper.labels.len(),
            Node::Leaf(_) => 0,
        };
        let children: Vec<NodeId> = (0..slots)
            .map(|slot| {
                if slot == split.child_node_index {
                    moved
                } else {
                    self.alloc(Node::empty_leaf())
                }
            })
            .collect();

        if let Node::Inner(upper) = &mut self.nodes[id.index()] {
            debug!(
                node = %id,
                moved = %moved,
                labels = ?upper.labels,
                "Split inner node"
            );
            upper.children = children;
        }
    }

    /// Splits the page at `start` with `pick_split` if it is over capacity,
    /// then does the same for every page the split produced.
    ///
    /// A page whose suffixes are all identical is left overfull: splitting it
    /// could never separate its entries.
    fn split_overfull(&mut self, start: NodeId, level: usize) {
        let capacity = self.config.leaf_capacity;
        let mut pending = vec![(start, level)];

        while let Some((id, level)) = pending.pop() {
            let entries = match &mut self.nodes[id.index()] {
                Node::Leaf(entries) if entries.len() > capacity && !same_suffix(entries) => {
                    std::mem::take(entries)
                }
                _ => continue,
            };

            let keys: Vec<Kmer> = entries.iter().map(|e| e.suffix).collect();
            let out = pick_split(&keys, Some(self.config.max_prefix_len));

            let mut pages = vec![Vec::new(); out.n_nodes()];
            for (i, entry) in entries.iter().enumerate() {
                pages[out.map_tuples_to_nodes[i]].push(LeafEntry {
                    suffix: out.leaf_tuples[i],
                    row: entry.row,
                });
            }
            let children: Vec<NodeId> = pages
                .into_iter()
                .map(|page| self.alloc(Node::Leaf(page)))
                .collect();

            let prefix_len = out.prefix_len();
            for (&child, label) in children.iter().zip(&out.labels) {
                pending.push((child, level + prefix_len + usize::from(!label.is_dummy())));
            }

            let all_the_same = out.labels.len() == 1;
            debug!(
                node = %id,
                entries = entries.len(),
                prefix_len,
                children = children.len(),
                all_the_same,
                "Split leaf page"
            );
            self.nodes[id.index()] = Node::Inner(InnerNode {
                prefix: out.prefix,
                labels: out.labels,
                children,
                all_the_same,
            });
        }
    }

    /// Depth-first traversal calling `visit` for every matching entry.
    fn scan<F>(&self, queries: &[Predicate], mut visit: F)
    where
        F: FnMut(Kmer, u32),
    {
        let mut stack = vec![(self.root, ReconstructionBuffer::new(), 0usize)];

        while let Some((id, reconstructed, level)) = stack.pop() {
            match &self.nodes[id.index()] {
                Node::Inner(inner) => {
                    let matches = inner_consistent(&InnerConsistentIn {
                        reconstructed: &reconstructed,
                        level,
                        prefix: inner.prefix.as_ref(),
                        labels: &inner.labels,
                        queries,
                    });
                    for m in matches.into_iter().rev() {
                        stack.push((
                            inner.children[m.node_index],
                            m.reconstructed,
                            level + m.level_add,
                        ));
                    }
                }
                Node::Leaf(entries) => {
                    for entry in entries {
                        let out = leaf_consistent(&LeafConsistentIn {
                            reconstructed: &reconstructed,
                            level,
                            leaf_suffix: &entry.suffix,
                            queries,
                        });
                        if out.matched {
                            visit(out.leaf_value, entry.row);
                        }
                    }
                }
            }
        }
    }
}

fn same_suffix(entries: &[LeafEntry]) -> bool {
    entries.windows(2).all(|w| w[0].suffix == w[1].suffix)
}
