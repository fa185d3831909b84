//! Index build from text input.
//!
//! Input holds one record per line: a k-mer, or with `--k` a DNA sequence
//! that is decomposed into its sliding-window k-mers. Blank lines and lines
//! starting with `>` or `#` are skipped.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use kmerdex_core::{DnaSequence, IndexConfig, Kmer, KmerIndex};

/// Build configuration
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// Decompose each line into k-mers of this length.
    pub k: Option<usize>,
    /// Insert keys one by one instead of bulk loading.
    pub incremental: bool,
    /// Page budget of the new index.
    pub index: IndexConfig,
    pub show_progress: bool,
}

/// Build statistics
#[derive(Debug, Default)]
pub struct BuildStats {
    pub lines: usize,
    pub kmers: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

impl BuildStats {
    /// Keys indexed per second
    pub fn kmers_per_sec(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.kmers as f64) / (self.duration_ms as f64 / 1000.0)
        }
    }
}

/// Parses one input line. `None` for lines that carry no record.
pub fn parse_record(line: &str, k: Option<usize>) -> Option<kmerdex_core::Result<Vec<Kmer>>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('>') || line.starts_with('#') {
        return None;
    }

    Some(match k {
        None => line.parse::<Kmer>().map(|kmer| vec![kmer]),
        Some(k) => line
            .parse::<DnaSequence>()
            .and_then(|sequence| sequence.kmers(k).map(Iterator::collect)),
    })
}

/// Reads every k-mer of `path`. Invalid lines are counted and skipped.
pub fn read_kmers(path: &Path, k: Option<usize>, stats: &mut BuildStats) -> Result<Vec<Kmer>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file {}", path.display()))?;
    let reader = BufReader::with_capacity(128 * 1024, file);

    let mut kmers = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        stats.lines += 1;
        match parse_record(&line, k) {
            None => {}
            Some(Ok(found)) => kmers.extend(found),
            Some(Err(err)) => {
                tracing::warn!(line = line_no + 1, error = %err, "Skipping invalid record");
                stats.errors += 1;
            }
        }
    }
    Ok(kmers)
}

/// Reads `path` and builds an index over its k-mers. Row ids follow input
/// order.
pub fn build_index(path: &Path, config: &BuildConfig) -> Result<(KmerIndex, BuildStats)> {
    let mut stats = BuildStats::default();
    let start = Instant::now();

    let kmers = read_kmers(path, config.k, &mut stats)?;
    if kmers.is_empty() {
        anyhow::bail!("No valid k-mers found in {}", path.display());
    }
    u32::try_from(kmers.len() - 1).context("Too many k-mers: row ids are 32-bit")?;

    let progress = create_progress_bar(kmers.len(), config.show_progress);
    let index = if config.incremental {
        let mut index = KmerIndex::with_config(config.index)?;
        for (row, kmer) in kmers.iter().enumerate() {
            index.insert(*kmer, row as u32);
            progress.inc(1);
        }
        index
    } else {
        let index = KmerIndex::bulk_load(
            config.index,
            kmers.iter().enumerate().map(|(row, kmer)| (*kmer, row as u32)),
        )?;
        progress.inc(kmers.len() as u64);
        index
    };
    progress.finish_with_message("Build complete");

    stats.kmers = kmers.len();
    stats.duration_ms = start.elapsed().as_millis() as u64;
    Ok((index, stats))
}

/// Create progress bar
fn create_progress_bar(total: usize, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(err) => tracing::debug!(error = %err, "Progress template rejected"),
    }
    pb
}
