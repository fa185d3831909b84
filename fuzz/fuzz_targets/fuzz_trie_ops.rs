//! Structured fuzz target: random inserts and queries against a linear scan.

#![no_main]

use arbitrary::Arbitrary;
use kmerdex_core::{IndexConfig, Kmer, KmerIndex, Predicate, QueryPattern};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    leaf_capacity: u8,
    max_prefix_len: u8,
    keys: Vec<Vec<u8>>,
    query: Query,
}

#[derive(Debug, Arbitrary)]
enum Query {
    Equal(Vec<u8>),
    StartsWith(Vec<u8>),
    Contains(Vec<u8>),
}

/// Maps arbitrary bytes onto nucleotides so most inputs produce keys.
fn to_kmer(bytes: &[u8]) -> Kmer {
    let symbols: Vec<u8> = bytes.iter().take(32).map(|b| b"ACGT"[(b & 3) as usize]).collect();
    Kmer::new(&symbols).expect("nucleotides only")
}

fn to_pattern(bytes: &[u8]) -> QueryPattern {
    let codes: Vec<u8> = bytes
        .iter()
        .take(32)
        .map(|b| b"ACGTUWSMKRYBDHVN"[(b & 15) as usize])
        .collect();
    QueryPattern::new(&codes).expect("IUPAC codes only")
}

fuzz_target!(|input: Input| {
    let config = IndexConfig {
        leaf_capacity: 2 + (input.leaf_capacity as usize % 16),
        max_prefix_len: 1 + (input.max_prefix_len as usize % 32),
    };
    let keys: Vec<Kmer> = input.keys.iter().take(512).map(|k| to_kmer(k)).collect();
    let query = match &input.query {
        Query::Equal(b) => Predicate::Equal(to_kmer(b)),
        Query::StartsWith(b) => Predicate::StartsWith(to_kmer(b)),
        Query::Contains(b) => Predicate::Contains(to_pattern(b)),
    };

    let mut index = KmerIndex::with_config(config).expect("valid config");
    for (row, key) in keys.iter().enumerate() {
        index.insert(*key, row as u32);
    }
    index.check_invariants().expect("invariants hold after inserts");

    let expected: Vec<u32> = keys
        .iter()
        .enumerate()
        .filter(|(_, k)| query.matches(k))
        .map(|(row, _)| row as u32)
        .collect();
    let found: Vec<u32> = index.search(&[query]).iter().collect();
    assert_eq!(found, expected);
});
