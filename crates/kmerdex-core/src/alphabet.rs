//! Nucleotide and IUPAC ambiguity alphabets.
//!
//! Both alphabets are described by static 256-entry lookup tables built at
//! compile time. Each entry is a bitmask over the four concrete nucleotides,
//! so matching an ambiguity code against a nucleotide is a single `AND`.
//!
//! | Code | Matches   | Code | Matches   |
//! |------|-----------|------|-----------|
//! | A    | A         | K    | G T       |
//! | C    | C         | R    | A G       |
//! | G    | G         | Y    | C T       |
//! | T, U | T         | B    | C G T     |
//! | W    | A T       | D    | A G T     |
//! | S    | C G       | H    | A C T     |
//! | M    | A C       | V    | A C G     |
//! |      |           | N    | A C G T   |

/// The four concrete nucleotides, in label order.
pub const NUCLEOTIDES: [u8; 4] = *b"ACGT";

/// The sixteen IUPAC ambiguity codes accepted in query patterns.
pub const IUPAC_CODES: [u8; 16] = *b"ACGTUWSMKRYBDHVN";

const BIT_A: u8 = 0b0001;
const BIT_C: u8 = 0b0010;
const BIT_G: u8 = 0b0100;
const BIT_T: u8 = 0b1000;

const fn iupac_mask(code: u8) -> u8 {
    match code.to_ascii_uppercase() {
        b'A' => BIT_A,
        b'C' => BIT_C,
        b'G' => BIT_G,
        b'T' | b'U' => BIT_T,
        b'W' => BIT_A | BIT_T,
        b'S' => BIT_C | BIT_G,
        b'M' => BIT_A | BIT_C,
        b'K' => BIT_G | BIT_T,
        b'R' => BIT_A | BIT_G,
        b'Y' => BIT_C | BIT_T,
        b'B' => BIT_C | BIT_G | BIT_T,
        b'D' => BIT_A | BIT_G | BIT_T,
        b'H' => BIT_A | BIT_C | BIT_T,
        b'V' => BIT_A | BIT_C | BIT_G,
        b'N' => BIT_A | BIT_C | BIT_G | BIT_T,
        _ => 0,
    }
}

const fn build_iupac_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = iupac_mask(i as u8);
        i += 1;
    }
    table
}

const fn build_nucleotide_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = match (i as u8).to_ascii_uppercase() {
            b'A' => BIT_A,
            b'C' => BIT_C,
            b'G' => BIT_G,
            b'T' => BIT_T,
            _ => 0,
        };
        i += 1;
    }
    table
}

static IUPAC_MASKS: [u8; 256] = build_iupac_table();
static NUCLEOTIDE_MASKS: [u8; 256] = build_nucleotide_table();

/// Returns true if `symbol` is a concrete nucleotide (either case).
#[inline]
#[must_use]
pub fn is_nucleotide(symbol: u8) -> bool {
    NUCLEOTIDE_MASKS[symbol as usize] != 0
}

/// Returns true if `code` is one of the sixteen IUPAC codes (either case).
#[inline]
#[must_use]
pub fn is_iupac(code: u8) -> bool {
    IUPAC_MASKS[code as usize] != 0
}

/// Validates a nucleotide and folds it to upper case.
#[inline]
#[must_use]
pub fn normalize_nucleotide(symbol: u8) -> Option<u8> {
    is_nucleotide(symbol).then(|| symbol.to_ascii_uppercase())
}

/// Validates an IUPAC code and folds it to upper case.
#[inline]
#[must_use]
pub fn normalize_iupac(code: u8) -> Option<u8> {
    is_iupac(code).then(|| code.to_ascii_uppercase())
}

/// Case-insensitive equality of two concrete symbols.
#[inline]
#[must_use]
pub fn symbols_equal(a: u8, b: u8) -> bool {
    a.eq_ignore_ascii_case(&b)
}

/// Returns true if the nucleotide `symbol` belongs to the set denoted by `code`.
///
/// # Panics
///
/// Panics if `code` is not an IUPAC code. Query patterns are validated on
/// construction, so reaching this with an unknown code is a caller bug.
#[inline]
#[must_use]
pub fn pattern_matches(code: u8, symbol: u8) -> bool {
    let mask = IUPAC_MASKS[code as usize];
    assert!(
        mask != 0,
        "pattern_matches: unrecognized IUPAC code {:?}",
        code as char
    );
    mask & NUCLEOTIDE_MASKS[symbol as usize] != 0
}

/// Length of the longest common prefix of `a` and `b` under [`symbols_equal`].
#[inline]
#[must_use]
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b)
        .take_while(|(x, y)| symbols_equal(**x, **y))
        .count()
}
