//! Output formatting for search results, stats and build summaries.

use anyhow::Result;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::path::Path;

use kmerdex_core::{IndexConfig, IndexStats, Kmer};

use crate::build::BuildStats;

/// Output format of `search` and `stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct MatchRow {
    row: u32,
    kmer: Kmer,
}

#[derive(Serialize)]
struct StatsReport<'a> {
    entries: usize,
    leaf_capacity: usize,
    max_prefix_len: usize,
    #[serde(flatten)]
    stats: &'a IndexStats,
}

/// Print search matches, sorted by row id
pub fn print_matches(matches: &[(Kmer, u32)], format: OutputFormat) -> Result<()> {
    let mut rows: Vec<MatchRow> = matches
        .iter()
        .map(|&(kmer, row)| MatchRow { row, kmer })
        .collect();
    rows.sort_by_key(|m| m.row);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("{}", "No results.".dimmed());
                return Ok(());
            }
            for m in &rows {
                println!("{}\t{}", m.row, m.kmer);
            }
        }
    }
    Ok(())
}

/// Print index shape as a table or JSON object
pub fn print_stats(
    path: &Path,
    len: usize,
    config: IndexConfig,
    stats: &IndexStats,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        let report = StatsReport {
            entries: len,
            leaf_capacity: config.leaf_capacity,
            max_prefix_len: config.max_prefix_len,
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "Index:".bold(), path.display());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("metric").fg(Color::Cyan),
            Cell::new("value").fg(Color::Cyan),
        ]);

    let rows: [(&str, usize); 8] = [
        ("entries", len),
        ("leaf_capacity", config.leaf_capacity),
        ("max_prefix_len", config.max_prefix_len),
        ("inner_nodes", stats.inner_nodes),
        ("leaf_pages", stats.leaf_pages),
        ("leaf_entries", stats.leaf_entries),
        ("max_depth", stats.max_depth),
        ("all_the_same_nodes", stats.all_the_same_nodes),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }

    println!("{table}");
    Ok(())
}

/// Print the summary of a `build` run
pub fn print_build_summary(output: &Path, stats: &BuildStats) {
    println!("\n{}", "Build Summary".green().bold());
    println!("  Lines read:       {}", stats.lines);
    println!("  K-mers indexed:   {}", stats.kmers.to_string().green());
    if stats.errors > 0 {
        println!("  Invalid records:  {}", stats.errors.to_string().red());
    }
    println!("  Duration:         {} ms", stats.duration_ms);
    println!("  Throughput:       {:.0} k-mers/sec", stats.kmers_per_sec());
    println!("  Snapshot:         {}", output.display());
}
