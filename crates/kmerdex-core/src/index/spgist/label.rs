//! Branch labels of inner nodes.

use std::fmt;

use crate::alphabet::is_nucleotide;

/// Label of one child slot in an inner node.
///
/// The declared label type is a small integer: `AllTheSame` is `-2`, `Stop`
/// is `-1` and `Symbol(b)` is the byte value. The derived ordering matches
/// that encoding, which is what keeps binary search over a node's labels
/// valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeLabel {
    /// Reserved label of the wrapper child created when a uniform node must
    /// accept a new label.
    AllTheSame,
    /// The key ends exactly at this node.
    Stop,
    /// Next symbol of the key.
    Symbol(u8),
}

impl NodeLabel {
    /// Label for the symbol at `index` of `symbols`, or `Stop` past the end.
    #[inline]
    #[must_use]
    pub fn at(symbols: &[u8], index: usize) -> Self {
        symbols.get(index).map_or(Self::Stop, |&s| Self::Symbol(s))
    }

    /// Labels that contribute no symbol to the reconstructed value.
    #[inline]
    #[must_use]
    pub fn is_dummy(self) -> bool {
        !matches!(self, Self::Symbol(_))
    }

    /// The symbol carried by this label, if any.
    #[inline]
    #[must_use]
    pub fn symbol(self) -> Option<u8> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Integer encoding used on pages.
    #[must_use]
    pub fn to_i16(self) -> i16 {
        match self {
            Self::AllTheSame => -2,
            Self::Stop => -1,
            Self::Symbol(s) => i16::from(s),
        }
    }

    /// Decodes the page encoding; `None` for values no label maps to.
    #[must_use]
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            -2 => Some(Self::AllTheSame),
            -1 => Some(Self::Stop),
            v => u8::try_from(v)
                .ok()
                .filter(|&s| is_nucleotide(s) && s.is_ascii_uppercase())
                .map(Self::Symbol),
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllTheSame => f.write_str("<same>"),
            Self::Stop => f.write_str("<stop>"),
            Self::Symbol(s) => write!(f, "{}", *s as char),
        }
    }
}
