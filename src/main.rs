use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use steerpairs::config::Config;
use steerpairs::pairs::kinds::{PairingKind, RepresentationKind};
use steerpairs::pairs::sampler::TopicId;
use steerpairs::pipeline::training_samples::{self, FailurePolicy};
use steerpairs::storage::json::JsonStore;
use steerpairs::storage::traits::PairSetKey;

/// steerpairs: contrastive training pairs for topic steering vectors.
///
/// Builds (positive, negative) text pairs for a target topic from per-topic
/// representations, drawing negatives fairly from every other topic.
#[derive(Parser)]
#[command(name = "steerpairs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and save training pairs for one topic
    Build {
        /// Representation kind (words, phrases, descriptions, summaries)
        #[arg(long)]
        kind: RepresentationKind,

        /// Pairing kind
        #[arg(long, default_value = "against_random_topic_representation")]
        pairing: PairingKind,

        /// Topic ID to use as the positive side
        #[arg(long)]
        topic: TopicId,

        /// Number of pairs (default: the kind's configured count)
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,

        /// Seed for pair sampling (overrides STEERPAIRS_SEED)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Build and save training pairs for every configured kind and topic
    BuildAll {
        /// Pairing kind
        #[arg(long, default_value = "against_random_topic_representation")]
        pairing: PairingKind,

        /// Skip topics with no usable data instead of stopping
        #[arg(long)]
        skip_failed: bool,

        /// Seed for pair sampling (overrides STEERPAIRS_SEED)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show a saved pair set
    Show {
        /// Representation kind
        #[arg(long)]
        kind: RepresentationKind,

        /// Pairing kind
        #[arg(long, default_value = "against_random_topic_representation")]
        pairing: PairingKind,

        /// Topic ID
        #[arg(long)]
        topic: TopicId,

        /// Max pairs to print (default: 20)
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("steerpairs=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            kind,
            pairing,
            topic,
            count,
            seed,
        } => {
            let config = Config::load()?;
            let store = open_store(&config);
            let mut rng = make_rng(seed.or(config.seed));
            let target = count.unwrap_or_else(|| config.experiment.num_samples_for(kind));

            println!("Building {kind} pairs for topic {topic} ({pairing})...");

            let set = training_samples::create_topic_training_samples(
                &store, &store, kind, pairing, topic, target, &mut rng,
            )?;

            let key = PairSetKey {
                kind,
                pairing,
                tid: topic,
            };
            println!(
                "{} {} of {} possible pairs saved to {}",
                "Done.".bold(),
                set.len(),
                set.total_candidates,
                store.pair_set_path(&key).display()
            );
        }

        Commands::BuildAll {
            pairing,
            skip_failed,
            seed,
        } => {
            let config = Config::load()?;
            let store = open_store(&config);
            let mut rng = make_rng(seed.or(config.seed));
            let policy = if skip_failed {
                FailurePolicy::SkipTopic
            } else {
                FailurePolicy::Abort
            };

            info!(pairing = %pairing, ?policy, "Starting batch run");
            println!("Building training pairs for all configured kinds and topics...");

            let summary = training_samples::create_all_training_samples(
                &config.experiment,
                &store,
                &store,
                pairing,
                policy,
                &mut rng,
            )?;

            steerpairs::output::terminal::display_batch_summary(&summary);
        }

        Commands::Show {
            kind,
            pairing,
            topic,
            limit,
        } => {
            let config = Config::load()?;
            let store = open_store(&config);
            let key = PairSetKey {
                kind,
                pairing,
                tid: topic,
            };
            let file = store.load_pair_set(&key)?;
            steerpairs::output::terminal::display_pair_set(&file, limit);
        }

        Commands::Config => {
            let config = Config::load()?;
            steerpairs::output::terminal::display_config(&config);
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> JsonStore {
    JsonStore::new(&config.representations_dir, &config.samples_dir)
}

/// Seeded generator when a seed is known, OS entropy otherwise.
fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            info!(seed, "Using seeded sampler");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}
