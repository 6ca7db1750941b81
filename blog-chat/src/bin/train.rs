//! blog-train - Offline chatbot training
//!
//! Reads the intents file, builds vocabulary and label set, fits the
//! classifier and writes words.json, classes.json and chatbot_model.safetensors
//! into the artifacts directory (overwriting previous artifacts).

use anyhow::{Context, Result};
use blog_chat::artifacts::{save_artifacts, ArtifactPaths};
use blog_chat::text::TextNormalizer;
use blog_chat::training::{train, TrainingConfig};
use blog_chat::IntentsFile;
use blog_common::BlogConfig;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{info, warn};

/// Command-line arguments for blog-train
#[derive(Parser, Debug)]
#[command(name = "blog-train")]
#[command(about = "Train the blog chatbot intent classifier")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "BLOG_CONFIG")]
    config: Option<PathBuf>,

    /// Intents file (overrides chat.intents_path)
    #[arg(long, env = "BLOG_INTENTS")]
    intents: Option<PathBuf>,

    /// Output directory for artifacts (overrides chat.artifacts_dir)
    #[arg(long, env = "BLOG_ARTIFACTS_DIR")]
    artifacts_dir: Option<PathBuf>,

    /// Passes over the training set
    #[arg(long, default_value_t = 200)]
    epochs: usize,

    /// Mini-batch size
    #[arg(long, default_value_t = 5)]
    batch_size: usize,

    /// SGD learning rate
    #[arg(long, default_value_t = 0.01)]
    learning_rate: f32,

    /// Seed for weight initialization and shuffling (dropout masks stay unseeded)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, source) = BlogConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Starting blog-train v{}", env!("CARGO_PKG_VERSION"));
    if source.is_defaults() {
        warn!("No config file loaded: {}", source);
    } else {
        info!("Configuration: {}", source);
    }

    let intents_path = args.intents.unwrap_or(config.chat.intents_path);
    let artifacts_dir = args.artifacts_dir.unwrap_or(config.chat.artifacts_dir);

    let intents = IntentsFile::load(&intents_path)
        .with_context(|| format!("Failed to load intents from {}", intents_path.display()))?;
    info!("Loaded {} intents from {}", intents.intents.len(), intents_path.display());

    let training = TrainingConfig {
        epochs: args.epochs,
        batch_size: args.batch_size,
        learning_rate: args.learning_rate,
        ..TrainingConfig::default()
    };
    let mut rng = match args.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let normalizer = TextNormalizer::default();
    let trained = train(&intents, &normalizer, &training, &mut rng).context("Training failed")?;

    let paths = ArtifactPaths::in_dir(&artifacts_dir);
    save_artifacts(&paths, &trained.vocabulary, &trained.labels, &trained.network)
        .context("Failed to write artifacts")?;

    info!("Model trained and saved to {}", artifacts_dir.display());
    Ok(())
}
