#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
//! `kmerdex` CLI - build and query k-mer indexes
//!
//! Usage:
//!   `kmerdex kmers ACGTACGT -k 4`
//!   `kmerdex build reads.txt -o reads.kmix --k 21`
//!   `kmerdex search reads.kmix --starts-with ACGT`
//!   `kmerdex stats reads.kmix`

mod build;
mod output;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kmerdex_core::{DnaSequence, KmerIndex, KmerdexConfig, LoggingConfig, Predicate};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "kmerdex")]
#[command(author, version, about = "kmerdex CLI - radix-trie index for DNA k-mers")]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ./kmerdex.toml when present)
    #[arg(long, global = true, env = "KMERDEX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sliding-window k-mers of a DNA sequence
    Kmers {
        /// DNA sequence
        sequence: String,

        /// Window length (1..=32)
        #[arg(short)]
        k: usize,
    },

    /// Build an index snapshot from a text file
    Build {
        /// Input file: one k-mer per line, or one sequence per line with --k
        input: PathBuf,

        /// Snapshot file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Decompose each input line into k-mers of this length
        #[arg(short, long)]
        k: Option<usize>,

        /// Insert keys one by one instead of bulk loading
        #[arg(long)]
        incremental: bool,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Search an index snapshot
    #[command(group(
        ArgGroup::new("predicate")
            .required(true)
            .multiple(true)
            .args(["equals", "starts_with", "contains"])
    ))]
    Search {
        /// Snapshot file
        index: PathBuf,

        /// Exact k-mer
        #[arg(long)]
        equals: Option<String>,

        /// K-mer prefix
        #[arg(long)]
        starts_with: Option<String>,

        /// IUPAC pattern of the same length as the k-mers to match
        #[arg(long)]
        contains: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show index statistics
    Stats {
        /// Snapshot file
        index: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<KmerdexConfig> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            KmerdexConfig::load_from_path(path)?
        }
        None => KmerdexConfig::load()?,
    };
    config.validate()?;
    Ok(config)
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn collect_predicates(
    equals: Option<&str>,
    starts_with: Option<&str>,
    contains: Option<&str>,
) -> kmerdex_core::Result<Vec<Predicate>> {
    let mut predicates = Vec::new();
    if let Some(kmer) = equals {
        predicates.push(Predicate::Equal(kmer.parse()?));
    }
    if let Some(prefix) = starts_with {
        predicates.push(Predicate::StartsWith(prefix.parse()?));
    }
    if let Some(pattern) = contains {
        predicates.push(Predicate::Contains(pattern.parse()?));
    }
    Ok(predicates)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging);

    match cli.command {
        Commands::Kmers { sequence, k } => {
            let sequence: DnaSequence = sequence.parse()?;
            for kmer in sequence.kmers(k)? {
                println!("{kmer}");
            }
        }
        Commands::Build {
            input,
            output,
            k,
            incremental,
            progress,
        } => {
            let build_config = build::BuildConfig {
                k,
                incremental,
                index: config.index,
                show_progress: progress,
            };
            let (index, stats) = build::build_index(&input, &build_config)?;
            index
                .save(&output)
                .with_context(|| format!("Failed to write snapshot {}", output.display()))?;
            output::print_build_summary(&output, &stats);
        }
        Commands::Search {
            index,
            equals,
            starts_with,
            contains,
            format,
        } => {
            let predicates = collect_predicates(
                equals.as_deref(),
                starts_with.as_deref(),
                contains.as_deref(),
            )?;
            let index = KmerIndex::load(&index)
                .with_context(|| format!("Failed to load snapshot {}", index.display()))?;
            output::print_matches(&index.search_entries(&predicates), format)?;
        }
        Commands::Stats { index: path, format } => {
            let index = KmerIndex::load(&path)
                .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            output::print_stats(&path, index.len(), index.config(), &index.stats(), format)?;
        }
    }

    Ok(())
}
