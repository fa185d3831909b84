//! Fuzz target for the index snapshot decoder.
//!
//! `KmerIndex::from_bytes` reads counts and handles from untrusted bytes.
//! Any input must either decode to an index that passes its own invariant
//! check and answers a full scan, or fail with an error. Never panic, never
//! loop.

#![no_main]

use kmerdex_core::{KmerIndex, Predicate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(index) = KmerIndex::from_bytes(data) {
        index
            .check_invariants()
            .expect("decoded index must satisfy invariants");
        let all = index.search(&[]);
        assert_eq!(all.len() as usize, unique_rows(&index));

        // Re-encoding a decoded image is lossless.
        let again = KmerIndex::from_bytes(&index.to_bytes()).expect("re-decode");
        assert_eq!(again.search(&[Predicate::StartsWith(Default::default())]), all);
    }
});

fn unique_rows(index: &KmerIndex) -> usize {
    let mut rows: Vec<u32> = index.search_entries(&[]).into_iter().map(|(_, r)| r).collect();
    rows.sort_unstable();
    rows.dedup();
    rows.len()
}
