//! Node splitter: distributes a set of keys over one new inner node.

use crate::alphabet::common_prefix_len;
use crate::kmer::Kmer;

use super::label::NodeLabel;

/// Result of [`pick_split`].
///
/// `map_tuples_to_nodes` and `leaf_tuples` are indexed like the input keys;
/// `labels` is deduplicated and strictly ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickSplitOut {
    /// Prefix shared by every key, `None` when empty.
    pub prefix: Option<Kmer>,
    /// Child labels, strictly ascending.
    pub labels: Vec<NodeLabel>,
    /// Child slot of each input key.
    pub map_tuples_to_nodes: Vec<usize>,
    /// Each input key with the prefix and its label stripped.
    pub leaf_tuples: Vec<Kmer>,
}

impl PickSplitOut {
    /// Number of child slots.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Length of the shared prefix.
    #[must_use]
    pub fn prefix_len(&self) -> usize {
        self.prefix.map_or(0, |p| p.len())
    }
}

/// Splits `keys` into one node: longest common prefix, then one child per
/// distinct next symbol (or `Stop` for keys that end at the prefix).
///
/// `max_prefix_len` caps the stored prefix to keep the node within a page
/// budget. It is a tunable: a shorter prefix only costs compression.
///
/// # Panics
///
/// Panics if `keys` is empty; a node is never emitted without labels.
#[must_use]
pub fn pick_split(keys: &[Kmer], max_prefix_len: Option<usize>) -> PickSplitOut {
    assert!(!keys.is_empty(), "pick_split: called with zero keys");

    let first = keys[0].as_bytes();
    let mut common_len = first.len();
    for key in &keys[1..] {
        if common_len == 0 {
            break;
        }
        common_len = common_len.min(common_prefix_len(first, key.as_bytes()));
    }
    if let Some(cap) = max_prefix_len {
        common_len = common_len.min(cap);
    }

    let prefix = (common_len > 0).then(|| keys[0].prefix(common_len));

    // Stable: equal labels keep input order.
    let mut order: Vec<(NodeLabel, usize)> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| (NodeLabel::at(key.as_bytes(), common_len), i))
        .collect();
    order.sort_by_key(|&(label, _)| label);

    let mut labels: Vec<NodeLabel> = Vec::new();
    let mut map_tuples_to_nodes = vec![0; keys.len()];
    let mut leaf_tuples = vec![Kmer::empty(); keys.len()];

    for &(label, i) in &order {
        if labels.last() != Some(&label) {
            labels.push(label);
        }
        map_tuples_to_nodes[i] = labels.len() - 1;
        leaf_tuples[i] = match label {
            NodeLabel::Symbol(_) => keys[i].suffix(common_len + 1),
            _ => Kmer::empty(),
        };
    }

    tracing::debug!(
        keys = keys.len(),
        prefix_len = common_len,
        nodes = labels.len(),
        "pick_split"
    );

    PickSplitOut {
        prefix,
        labels,
        map_tuples_to_nodes,
        leaf_tuples,
    }
}
