//! Benchmarks for the k-mer trie.
//!
//! Compares incremental inserts with bulk loading, and indexed search with a
//! linear scan over the same keys.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kmerdex_core::{DnaSequence, IndexConfig, Kmer, KmerIndex, Predicate, QueryPattern};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const K: usize = 21;

fn generate_genome(len: usize, seed: u64) -> DnaSequence {
    let mut rng = StdRng::seed_from_u64(seed);
    let symbols: Vec<u8> = (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect();
    DnaSequence::new(&symbols).expect("generated symbols are nucleotides")
}

fn generate_kmers(count: usize) -> Vec<Kmer> {
    generate_genome(count + K - 1, 42)
        .kmers(K)
        .expect("genome longer than k")
        .collect()
}

fn build(kmers: &[Kmer]) -> KmerIndex {
    KmerIndex::bulk_load(
        IndexConfig::default(),
        kmers.iter().enumerate().map(|(i, k)| (*k, i as u32)),
    )
    .expect("default config is valid")
}

fn bench_trie_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_build");

    for size in [1_000, 10_000, 100_000] {
        let kmers = generate_kmers(size);

        group.bench_with_input(BenchmarkId::new("insert", size), &kmers, |b, kmers| {
            b.iter(|| {
                let mut index = KmerIndex::new();
                for (i, kmer) in kmers.iter().enumerate() {
                    index.insert(*kmer, i as u32);
                }
                black_box(index)
            });
        });

        group.bench_with_input(BenchmarkId::new("bulk_load", size), &kmers, |b, kmers| {
            b.iter(|| black_box(build(kmers)));
        });
    }

    group.finish();
}

fn bench_trie_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_search");

    for size in [10_000, 100_000] {
        let kmers = generate_kmers(size);
        let index = build(&kmers);
        let probe = kmers[size / 2];
        let equal = [Predicate::Equal(probe)];
        let prefix = [Predicate::StartsWith(probe.prefix(6))];
        let mut wildcard = probe.as_bytes().to_vec();
        wildcard[3] = b'N';
        wildcard[10] = b'R';
        let pattern = [Predicate::Contains(
            QueryPattern::new(&wildcard).expect("valid pattern"),
        )];

        group.bench_with_input(BenchmarkId::new("equal", size), &index, |b, index| {
            b.iter(|| black_box(index.search(&equal)));
        });
        group.bench_with_input(BenchmarkId::new("starts_with", size), &index, |b, index| {
            b.iter(|| black_box(index.search(&prefix)));
        });
        group.bench_with_input(BenchmarkId::new("contains", size), &index, |b, index| {
            b.iter(|| black_box(index.search(&pattern)));
        });
    }

    group.finish();
}

fn bench_trie_vs_linear(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_vs_linear");

    let kmers = generate_kmers(10_000);
    let index = build(&kmers);
    let query = [Predicate::StartsWith(kmers[1234].prefix(8))];

    group.bench_function("with_index_10k", |b| {
        b.iter(|| black_box(index.search(&query)));
    });

    group.bench_function("linear_scan_10k", |b| {
        b.iter(|| {
            let results: Vec<usize> = kmers
                .iter()
                .enumerate()
                .filter(|(_, kmer)| query.iter().all(|q| q.matches(kmer)))
                .map(|(i, _)| i)
                .collect();
            black_box(results)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_trie_build,
    bench_trie_search,
    bench_trie_vs_linear,
);
criterion_main!(benches);
