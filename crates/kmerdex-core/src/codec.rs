//! Persisted layout of keys, prefixes and leaf suffixes.
//!
//! ```text
//! +--------+----------------------+
//! | len u8 | len raw symbol bytes |
//! +--------+----------------------+
//! ```
//!
//! No padding and no terminator: the explicit length is authoritative.

use bytes::{Buf, BufMut};

use crate::alphabet::is_nucleotide;
use crate::error::{Error, Result};
use crate::kmer::{Kmer, MAX_KMER_LEN};

/// Encoded size of `kmer` in bytes.
#[inline]
#[must_use]
pub fn encoded_len(kmer: &Kmer) -> usize {
    1 + kmer.len()
}

/// Appends the length-prefixed symbols of `kmer` to `buf`.
pub fn encode_kmer<B: BufMut>(kmer: &Kmer, buf: &mut B) {
    buf.put_u8(kmer.len() as u8);
    buf.put_slice(kmer.as_bytes());
}

/// Reads one length-prefixed k-mer from `buf`.
///
/// # Errors
///
/// Returns [`Error::Corrupted`] on truncation, an out-of-range length or a
/// byte that is not an upper-case nucleotide.
pub fn decode_kmer<B: Buf>(buf: &mut B) -> Result<Kmer> {
    if !buf.has_remaining() {
        return Err(Error::Corrupted("missing k-mer length byte".to_string()));
    }
    let len = buf.get_u8() as usize;
    if len > MAX_KMER_LEN {
        return Err(Error::Corrupted(format!(
            "k-mer length {len} exceeds {MAX_KMER_LEN}"
        )));
    }
    if buf.remaining() < len {
        return Err(Error::Corrupted(format!(
            "k-mer truncated: need {len} bytes, {} left",
            buf.remaining()
        )));
    }

    let mut symbols = [0u8; MAX_KMER_LEN];
    buf.copy_to_slice(&mut symbols[..len]);
    if let Some(position) = symbols[..len]
        .iter()
        .position(|&s| !(is_nucleotide(s) && s.is_ascii_uppercase()))
    {
        return Err(Error::Corrupted(format!(
            "invalid stored symbol 0x{:02x} at position {position}",
            symbols[position]
        )));
    }
    Ok(Kmer::from_normalized(&symbols[..len]))
}
