//! Error types for `kmerdex`.
//!
//! Validation failures on k-mers, query patterns and DNA sequences surface here
//! as rejected constructions. Contract violations inside the index callbacks
//! are not represented: they panic, because a plausible-looking wrong answer
//! would corrupt the index silently.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for `kmerdex` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `kmerdex` operations.
///
/// Error codes follow the pattern `KMER-XXX` for easy debugging.
#[derive(Error, Debug)]
pub enum Error {
    /// Symbol outside the declared alphabet (KMER-001).
    #[error("[KMER-001] Invalid {kind} symbol '{symbol}' at position {position}")]
    InvalidSymbol {
        /// Value type being parsed (`kmer`, `qkmer`, `dna`).
        kind: &'static str,
        /// The rejected character.
        symbol: char,
        /// Zero-based position of the rejected character.
        position: usize,
    },

    /// Input longer than the indexable capacity (KMER-002).
    #[error("[KMER-002] Input exceeds maximum length allowed for type {kind} ({max}), got {len}")]
    LengthExceeded {
        /// Value type being parsed.
        kind: &'static str,
        /// Actual length.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Invalid window size for k-mer generation (KMER-003).
    #[error("[KMER-003] Invalid k value {k}: must be between 1 and min(sequence length {sequence_len}, 32)")]
    InvalidK {
        /// Requested window size.
        k: usize,
        /// Length of the source sequence.
        sequence_len: usize,
    },

    /// Strategy number not implemented by the index (KMER-004).
    #[error("[KMER-004] Unrecognized strategy number: {0}")]
    UnknownStrategy(u16),

    /// Configuration error (KMER-005).
    #[error("[KMER-005] Configuration error: {0}")]
    Config(String),

    /// Snapshot or page image is corrupted (KMER-006).
    #[error("[KMER-006] Index corrupted: {0}")]
    Corrupted(String),

    /// IO error (KMER-007).
    #[error("[KMER-007] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal invariant broken (KMER-008).
    ///
    /// Indicates an index structure that violates its own invariants. Please report if encountered.
    #[error("[KMER-008] Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns the error code (e.g., "KMER-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidSymbol { .. } => "KMER-001",
            Self::LengthExceeded { .. } => "KMER-002",
            Self::InvalidK { .. } => "KMER-003",
            Self::UnknownStrategy(_) => "KMER-004",
            Self::Config(_) => "KMER-005",
            Self::Corrupted(_) => "KMER-006",
            Self::Io(_) => "KMER-007",
            Self::Internal(_) => "KMER-008",
        }
    }

    /// Returns true if this error is recoverable.
    ///
    /// Non-recoverable errors include corruption and internal errors.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Corrupted(_) | Self::Internal(_))
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
