//! Query predicates understood by the index.
//!
//! The host addresses comparisons by strategy number. Numbers are turned into
//! the closed [`Predicate`] enum at construction, so an unknown strategy is
//! rejected at the boundary and never reaches the evaluator.

use serde::{Deserialize, Serialize};

use crate::alphabet::symbols_equal;
use crate::error::{Error, Result};
use crate::kmer::Kmer;
use crate::qkmer::QueryPattern;

/// Strategy numbers of the operator class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StrategyNumber {
    /// `kmer = kmer`
    Equal = 1,
    /// `starts_with(prefix, kmer)`
    StartsWith = 2,
    /// `contains(qkmer, kmer)`
    Contains = 3,
}

impl TryFrom<u16> for StrategyNumber {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            1 => Ok(Self::Equal),
            2 => Ok(Self::StartsWith),
            3 => Ok(Self::Contains),
            other => Err(Error::UnknownStrategy(other)),
        }
    }
}

/// One scan key: a comparison and its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    /// Exact equality with the k-mer.
    Equal(Kmer),
    /// The indexed k-mer starts with this one.
    StartsWith(Kmer),
    /// The indexed k-mer matches the pattern position by position.
    Contains(QueryPattern),
}

impl Predicate {
    /// Builds a predicate from a host strategy number and its textual argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStrategy`] for an unimplemented strategy, or a
    /// validation error if the argument does not parse.
    pub fn from_strategy(strategy: u16, argument: &str) -> Result<Self> {
        Ok(match StrategyNumber::try_from(strategy)? {
            StrategyNumber::Equal => Self::Equal(argument.parse()?),
            StrategyNumber::StartsWith => Self::StartsWith(argument.parse()?),
            StrategyNumber::Contains => Self::Contains(argument.parse()?),
        })
    }

    /// Strategy number of this predicate.
    #[must_use]
    pub fn strategy(&self) -> StrategyNumber {
        match self {
            Self::Equal(_) => StrategyNumber::Equal,
            Self::StartsWith(_) => StrategyNumber::StartsWith,
            Self::Contains(_) => StrategyNumber::Contains,
        }
    }

    /// The query argument as raw symbols.
    #[must_use]
    pub fn argument(&self) -> &[u8] {
        match self {
            Self::Equal(k) | Self::StartsWith(k) => k.as_bytes(),
            Self::Contains(p) => p.as_bytes(),
        }
    }

    /// True if no symbol of `partial` in `from..min(query len, partial len)`
    /// contradicts the query.
    #[must_use]
    pub fn overlap_matches(&self, partial: &[u8], from: usize) -> bool {
        match self {
            Self::Equal(key) | Self::StartsWith(key) => {
                let query = key.as_bytes();
                let end = query.len().min(partial.len());
                from >= end
                    || query[from..end]
                        .iter()
                        .zip(&partial[from..end])
                        .all(|(&q, &s)| symbols_equal(q, s))
            }
            Self::Contains(pattern) => pattern.matches_prefix_from(partial, from),
        }
    }

    /// Whether some key extending `partial` can still satisfy the predicate.
    ///
    /// Symbols before `verified` were accepted at an ancestor and are skipped.
    #[must_use]
    pub fn is_consistent_prefix(&self, partial: &[u8], verified: usize) -> bool {
        if !self.overlap_matches(partial, verified) {
            return false;
        }
        match self {
            Self::StartsWith(_) => true,
            Self::Equal(_) | Self::Contains(_) => self.argument().len() >= partial.len(),
        }
    }

    /// Exact evaluation against a complete key.
    #[must_use]
    pub fn matches(&self, kmer: &Kmer) -> bool {
        match self {
            Self::Equal(query) => kmer.equals(query),
            Self::StartsWith(prefix) => kmer.starts_with(prefix),
            Self::Contains(pattern) => pattern.matches(kmer),
        }
    }
}
