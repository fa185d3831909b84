//! Query consistency evaluator: which children a scan descends into, and
//! whether a leaf entry is a result.

use crate::kmer::Kmer;

use super::label::NodeLabel;
use super::query::Predicate;
use super::reconstruct::ReconstructionBuffer;

/// Input of [`inner_consistent`].
#[derive(Debug, Clone, Copy)]
pub struct InnerConsistentIn<'a> {
    /// Path value accumulated by the ancestors.
    pub reconstructed: &'a ReconstructionBuffer,
    /// Symbols already verified against every predicate by the ancestors.
    pub level: usize,
    /// Prefix of the node, if any.
    pub prefix: Option<&'a Kmer>,
    /// Labels of the node.
    pub labels: &'a [NodeLabel],
    /// Predicates, combined with AND.
    pub queries: &'a [Predicate],
}

/// One child that may hold results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerConsistentMatch {
    /// Child slot.
    pub node_index: usize,
    /// Symbols this node adds to the level.
    pub level_add: usize,
    /// Path value of the child, owned by its branch.
    pub reconstructed: ReconstructionBuffer,
}

/// Returns the children of a node whose subtree may satisfy every predicate.
///
/// # Panics
///
/// Panics if the reconstructed path would exceed the maximum key length.
#[must_use]
pub fn inner_consistent(input: &InnerConsistentIn<'_>) -> Vec<InnerConsistentMatch> {
    let mut base = input.reconstructed.clone();
    let prefix_len = input.prefix.map_or(0, |p| p.len());
    if let Some(prefix) = input.prefix {
        base.extend_from_slice(prefix.as_bytes());
    }

    let mut out = Vec::with_capacity(input.labels.len());
    for (node_index, &label) in input.labels.iter().enumerate() {
        let mut reconstructed = base.clone();
        if let Some(symbol) = label.symbol() {
            reconstructed.push(symbol);
        }

        let partial = reconstructed.as_bytes();
        let accepted = input
            .queries
            .iter()
            .all(|q| q.is_consistent_prefix(partial, input.level));

        if accepted {
            out.push(InnerConsistentMatch {
                node_index,
                level_add: prefix_len + usize::from(!label.is_dummy()),
                reconstructed,
            });
        } else {
            tracing::trace!(%label, path = ?partial, "inner_consistent: pruned");
        }
    }
    out
}

/// Input of [`leaf_consistent`].
#[derive(Debug, Clone, Copy)]
pub struct LeafConsistentIn<'a> {
    /// Path value accumulated by the ancestors.
    pub reconstructed: &'a ReconstructionBuffer,
    /// Length of the path value.
    pub level: usize,
    /// Suffix stored in the leaf entry.
    pub leaf_suffix: &'a Kmer,
    /// Predicates, combined with AND.
    pub queries: &'a [Predicate],
}

/// Verdict for one leaf entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafConsistentOut {
    /// All predicates hold for the full key.
    pub matched: bool,
    /// The full reconstructed key.
    pub leaf_value: Kmer,
    /// Whether the host must re-verify against the heap row. Always `false`:
    /// the evaluation here is exact.
    pub recheck: bool,
}

/// Evaluates every predicate exactly against `reconstructed ++ leaf_suffix`.
///
/// # Panics
///
/// Panics if the full key would exceed the maximum key length.
#[must_use]
pub fn leaf_consistent(input: &LeafConsistentIn<'_>) -> LeafConsistentOut {
    debug_assert_eq!(input.level, input.reconstructed.len());

    let mut full = input.reconstructed.clone();
    full.extend_from_slice(input.leaf_suffix.as_bytes());
    let leaf_value = full.to_kmer();
    let matched = input.queries.iter().all(|q| q.matches(&leaf_value));

    LeafConsistentOut {
        matched,
        leaf_value,
        recheck: false,
    }
}
