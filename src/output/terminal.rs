// Colored terminal output for pair sets and batch runs.
//
// main.rs delegates all display work here so the pipeline code stays free
// of presentation concerns.

use colored::Colorize;

use crate::config::{Config, ExperimentConfig};
use crate::pipeline::training_samples::BatchSummary;
use crate::storage::json::PairSetFile;

/// Display a persisted pair set, showing at most `limit` pairs.
pub fn display_pair_set(file: &PairSetFile, limit: usize) {
    println!(
        "\n{}",
        format!(
            "=== Topic {} | {} | {} ===",
            file.topic_id, file.representation_kind, file.pairing_kind
        )
        .bold()
    );
    println!(
        "  {} pairs (requested {}, {} possible), created {}",
        file.pairs.len(),
        file.requested,
        file.total_candidates,
        file.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    if file.pairs.is_empty() {
        println!("  {}", "No pairs in this set.".dimmed());
        return;
    }

    for (i, pair) in file.pairs.iter().take(limit).enumerate() {
        println!(
            "  {:>4}. {} {}",
            i + 1,
            "+".green().bold(),
            super::truncate_chars(&pair.positive, 100)
        );
        println!(
            "        {} {}",
            "-".red().bold(),
            super::truncate_chars(&pair.negative, 100).dimmed()
        );
    }

    if file.pairs.len() > limit {
        println!(
            "\n  {}",
            format!("... {} more not shown", file.pairs.len() - limit).dimmed()
        );
    }
}

/// Display the per-kind results of a batch run.
pub fn display_batch_summary(summary: &BatchSummary) {
    println!("\n{}", "=== Training Sample Summary ===".bold());
    println!();
    println!(
        "  {:<14} {:>8} {:>8} {:>10}",
        "Kind".dimmed(),
        "Written".dimmed(),
        "Skipped".dimmed(),
        "Pairs".dimmed(),
    );
    println!("  {}", "-".repeat(43).dimmed());

    for kind in &summary.kinds {
        let skipped = kind.skipped.len();
        let skipped_str = format!("{skipped:>8}");
        let skipped_str = if skipped > 0 {
            skipped_str.yellow()
        } else {
            skipped_str.normal()
        };
        println!(
            "  {:<14} {:>8} {} {:>10}",
            kind.kind, kind.written, skipped_str, kind.pairs
        );
    }

    println!();
    println!(
        "  {} pair sets written, {} pairs total",
        summary.total_written(),
        summary.total_pairs()
    );

    for kind in &summary.kinds {
        for (tid, reason) in &kind.skipped {
            println!(
                "  {} {} topic {}: {}",
                "Skipped".yellow(),
                kind.kind,
                tid,
                reason.dimmed()
            );
        }
    }
}

/// Display the effective configuration.
pub fn display_config(config: &Config) {
    println!("\n{}", "=== Configuration ===".bold());
    println!(
        "  Representations: {}",
        config.representations_dir.display()
    );
    println!("  Training samples: {}", config.samples_dir.display());
    match config.seed {
        Some(seed) => println!("  Seed: {seed}"),
        None => println!("  Seed: {}", "(random)".dimmed()),
    }
    display_experiment(&config.experiment);
}

fn display_experiment(experiment: &ExperimentConfig) {
    println!("\n  {}", "Representation kinds:".bold());
    for &kind in &experiment.representation_kinds {
        println!(
            "    {:<14} {} pairs per topic",
            kind,
            experiment.num_samples_for(kind)
        );
    }

    if experiment.topic_ids.is_empty() {
        println!("\n  Topics: {}", "every topic in each pool".dimmed());
    } else {
        let ids: Vec<String> = experiment.topic_ids.iter().map(|t| t.to_string()).collect();
        println!("\n  Topics ({}): {}", ids.len(), ids.join(", "));
    }
}
