//! blog-api - Blog posts and chatbot HTTP service
//!
//! Start-up order: configuration, logging, database, chat model. Any failure
//! before the listener binds ends the process with an error.

use anyhow::{Context, Result};
use blog_api::{build_router, db, AppState};
use blog_chat::ChatContext;
use blog_common::BlogConfig;
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

/// Command-line arguments for blog-api
#[derive(Parser, Debug)]
#[command(name = "blog-api")]
#[command(about = "Blog posts API with an intent-classifying chatbot")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "BLOG_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port (overrides config)
    #[arg(short, long, env = "BLOG_PORT")]
    port: Option<u16>,

    /// SQLite database file (overrides config)
    #[arg(short, long, env = "BLOG_DATABASE")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (mut config, source) = BlogConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting blog-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if source.is_defaults() {
        warn!("No config file loaded: {}", source);
    } else {
        info!("Configuration: {}", source);
    }

    let pool = db::init_database_pool(&config.database_path)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_path.display()))?;

    let chat = ChatContext::load(&config.chat.intents_path, &config.chat.artifacts_dir)
        .with_context(|| {
            format!(
                "Failed to load chat model (intents {}, artifacts {})",
                config.chat.intents_path.display(),
                config.chat.artifacts_dir.display()
            )
        })?;

    let state = AppState::new(pool, chat, config.posts.clone());
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("blog-api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
