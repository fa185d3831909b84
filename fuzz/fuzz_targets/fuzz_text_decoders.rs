//! Fuzz target for the text and binary k-mer decoders.
//!
//! Parsing arbitrary bytes as a k-mer, pattern or DNA sequence must never
//! panic; whatever parses must print back to its upper-cased input.

#![no_main]

use kmerdex_core::codec::{decode_kmer, encode_kmer};
use kmerdex_core::{DnaSequence, Kmer, QueryPattern};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(kmer) = Kmer::new(data) {
        assert_eq!(kmer.as_bytes(), data.to_ascii_uppercase().as_slice());
        let mut buf = Vec::new();
        encode_kmer(&kmer, &mut buf);
        let decoded = decode_kmer(&mut buf.as_slice()).expect("encoded kmer decodes");
        assert_eq!(decoded, kmer);
    }

    if let Ok(pattern) = QueryPattern::new(data) {
        assert_eq!(pattern.as_bytes(), data.to_ascii_uppercase().as_slice());
    }

    if let Ok(sequence) = DnaSequence::new(data) {
        let k = (data.len() % 33).max(1);
        if let Ok(windows) = sequence.kmers(k) {
            assert_eq!(windows.len(), sequence.len() + 1 - k);
        }
    }

    let mut raw = data;
    let _ = decode_kmer(&mut raw);
});
