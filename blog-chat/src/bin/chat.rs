//! blog-chat - Console chatbot
//!
//! Loads the same intents file and artifacts as the API server, then
//! answers one stdin line at a time until end of input.

use anyhow::{Context, Result};
use blog_chat::ChatContext;
use blog_common::BlogConfig;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Command-line arguments for blog-chat
#[derive(Parser, Debug)]
#[command(name = "blog-chat")]
#[command(about = "Chat with the blog bot on the console")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "BLOG_CONFIG")]
    config: Option<PathBuf>,

    /// Intents file (overrides chat.intents_path)
    #[arg(long, env = "BLOG_INTENTS")]
    intents: Option<PathBuf>,

    /// Artifacts directory (overrides chat.artifacts_dir)
    #[arg(long, env = "BLOG_ARTIFACTS_DIR")]
    artifacts_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, source) = BlogConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    // Logs go to stderr so replies on stdout stay clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    if source.is_defaults() {
        warn!("No config file loaded: {}", source);
    }

    let intents_path = args.intents.unwrap_or(config.chat.intents_path);
    let artifacts_dir = args.artifacts_dir.unwrap_or(config.chat.artifacts_dir);
    let context = ChatContext::load(&intents_path, &artifacts_dir)
        .context("Failed to load chat model")?;

    info!("Bot is running (end input with Ctrl-D)");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut rng = rand::thread_rng();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        match context.respond(&line, &mut rng) {
            Ok(reply) => {
                writeln!(stdout, "{}", reply)?;
                stdout.flush()?;
            }
            Err(e) => error!("Failed to answer message: {}", e),
        }
    }

    Ok(())
}
