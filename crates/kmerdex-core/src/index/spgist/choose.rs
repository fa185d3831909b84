//! Descent chooser: positions one key inside an existing inner node.

use crate::alphabet::common_prefix_len;
use crate::kmer::Kmer;

use super::label::NodeLabel;

/// Read-only view of the inner node being descended.
#[derive(Debug, Clone, Copy)]
pub struct InnerNodeView<'a> {
    /// Prefix stored in the node, if any.
    pub prefix: Option<&'a Kmer>,
    /// Child labels, strictly ascending.
    pub labels: &'a [NodeLabel],
    /// The node's children are interchangeable; no new label may be added.
    pub all_the_same: bool,
}

impl InnerNodeView<'_> {
    /// Panics unless the labels are non-empty and strictly ascending.
    pub(crate) fn assert_labels_valid(&self) {
        assert!(!self.labels.is_empty(), "inner node has zero labels");
        assert!(
            self.labels.windows(2).all(|w| w[0] < w[1]),
            "inner node labels are not strictly ascending: {:?}",
            self.labels
        );
    }
}

/// Structural rewrite requested by [`choose`].
///
/// The current node becomes an upper node holding `prefix_prefix` and the
/// labels `prefix_labels`; its previous content moves into a new node under
/// `prefix_labels[child_node_index]`, with its prefix replaced by
/// `postfix_prefix`. The caller then runs `choose` again on the upper node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitTuple {
    /// Prefix kept by the upper node.
    pub prefix_prefix: Option<Kmer>,
    /// Labels of the upper node.
    pub prefix_labels: Vec<NodeLabel>,
    /// Slot of the upper node that receives the old node.
    pub child_node_index: usize,
    /// New prefix of the old node.
    pub postfix_prefix: Option<Kmer>,
}

/// Outcome of [`choose`]. The three variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooseResult {
    /// Descend into an existing child.
    MatchNode {
        /// Child slot to follow.
        node_index: usize,
        /// Symbols consumed at this node (prefix, plus the label symbol).
        level_add: usize,
        /// Unconsumed remainder of the key.
        rest: Kmer,
    },
    /// Add a child with `label` at position `insert_at`, then choose again.
    AddNode {
        /// Label of the new child.
        label: NodeLabel,
        /// Insertion point that keeps the labels sorted.
        insert_at: usize,
    },
    /// Rewrite the node, then choose again.
    SplitTuple(SplitTuple),
}

/// Decides where `key` goes in `node`, given that its first `level` symbols
/// are already accounted for by ancestors.
///
/// # Panics
///
/// Panics if `level` exceeds the key length or the node's labels are empty
/// or unsorted.
#[must_use]
pub fn choose(key: &Kmer, level: usize, node: &InnerNodeView<'_>) -> ChooseResult {
    assert!(
        level <= key.len(),
        "choose: level {level} past key length {}",
        key.len()
    );
    node.assert_labels_valid();

    let remaining = key.slice(level..).as_bytes();
    let mut common_len = 0;

    if let Some(prefix) = node.prefix {
        common_len = common_prefix_len(remaining, prefix.as_bytes());

        if common_len < prefix.len() {
            let split = SplitTuple {
                prefix_prefix: (common_len > 0).then(|| prefix.prefix(common_len)),
                prefix_labels: vec![NodeLabel::Symbol(prefix.as_bytes()[common_len])],
                child_node_index: 0,
                postfix_prefix: (prefix.len() - common_len > 1)
                    .then(|| prefix.suffix(common_len + 1)),
            };
            tracing::debug!(
                key = %key,
                level,
                common_len,
                prefix = %prefix,
                "choose: prefix mismatch, splitting node"
            );
            return ChooseResult::SplitTuple(split);
        }
    }

    let label = NodeLabel::at(remaining, common_len);

    match node.labels.binary_search(&label) {
        Ok(node_index) => {
            let level_add = common_len + usize::from(!label.is_dummy());
            ChooseResult::MatchNode {
                node_index,
                level_add,
                rest: key.suffix(level + level_add),
            }
        }
        Err(_) if node.all_the_same => {
            tracing::debug!(key = %key, level, %label, "choose: uniform node, splitting");
            ChooseResult::SplitTuple(SplitTuple {
                prefix_prefix: node.prefix.copied(),
                prefix_labels: vec![NodeLabel::AllTheSame],
                child_node_index: 0,
                postfix_prefix: None,
            })
        }
        Err(insert_at) => ChooseResult::AddNode { label, insert_at },
    }
}
