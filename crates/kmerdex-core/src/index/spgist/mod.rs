//! Space-partitioned radix trie callbacks for k-mers.
//!
//! The host engine owns pages, locking and traversal; this module supplies the
//! per-node decisions it asks for:
//!
//! - [`configure`]: label, prefix and leaf value types
//! - [`choose`]: where an inserted key goes in an existing inner node
//! - [`pick_split`]: how an overfull leaf page becomes one inner node
//! - [`inner_consistent`] / [`leaf_consistent`]: which subtrees and entries
//!   a scan visits and returns
//!
//! Inner nodes store a common prefix and one child per distinct next symbol.
//! Leaves store only the key suffix below the path, so a scan inspects each
//! key symbol at most once.
//!
//! # Module Organization
//!
//! - `label`: node labels and their integer encoding
//! - `picksplit`: node splitter
//! - `choose`: descent chooser
//! - `query`: predicates and strategy numbers
//! - `consistent`: inner and leaf evaluators
//! - `reconstruct`: per-branch path buffer

mod choose;
mod consistent;
mod label;
mod picksplit;
mod query;
mod reconstruct;

#[cfg(test)]
mod tests;

pub use choose::{choose, ChooseResult, InnerNodeView, SplitTuple};
pub use consistent::{
    inner_consistent, leaf_consistent, InnerConsistentIn, InnerConsistentMatch, LeafConsistentIn,
    LeafConsistentOut,
};
pub use label::NodeLabel;
pub use picksplit::{pick_split, PickSplitOut};
pub use query::{Predicate, StrategyNumber};
pub use reconstruct::ReconstructionBuffer;

/// Storage type declared for labels, prefixes or leaf values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Two-byte signed integer.
    Int16,
    /// Length-prefixed k-mer.
    Kmer,
}

/// Answer to the host's `configure` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpgConfig {
    /// Type of node labels.
    pub label_type: ValueType,
    /// Type of inner node prefixes.
    pub prefix_type: ValueType,
    /// Type of values stored in leaves.
    pub leaf_type: ValueType,
    /// Index-only scans can return the reconstructed key.
    pub can_return_data: bool,
    /// Whether keys may exceed one page. They cannot: keys are at most 32
    /// symbols.
    pub long_values_ok: bool,
}

/// Static configuration of the k-mer operator class.
#[must_use]
pub const fn configure() -> SpgConfig {
    SpgConfig {
        label_type: ValueType::Int16,
        prefix_type: ValueType::Kmer,
        leaf_type: ValueType::Kmer,
        can_return_data: true,
        long_values_ok: false,
    }
}
