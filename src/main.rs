//! Main entry point for the Duel Finder matchmaking service
//!
//! This is the production entry point that loads configuration, initializes
//! logging and runs the HTTP matchmaker until a shutdown signal arrives.

use anyhow::Result;
use clap::Parser;
use duel_finder::config::AppConfig;
use duel_finder::service::{AppState, HttpServer};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Duel Finder Matchmaking Service - pairs a player with the best waiting opponent
#[derive(Parser)]
#[command(
    name = "duel-finder",
    version,
    about = "A matchmaking microservice that pairs a player with the best waiting opponent",
    long_about = "Duel Finder answers GET /matchmaker/{player_handle}?game={game} with the most \
                 suitable opponent waiting for that game. Candidates are narrowed by a skill \
                 window that widens on every retry and ranked on wait time, skill gap and \
                 rank parity."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// HTTP port override
    #[arg(long, value_name = "PORT", help = "Override HTTP server port")]
    port: Option<u16>,

    /// Player collection override
    #[arg(long, value_name = "FILE", help = "Override the players JSON document")]
    players: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration and exit without starting service"
    )]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig) {
    info!("Duel Finder Matchmaking Service");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   Listening on: {}", config.bind_address());
    info!("   Players: {}", config.store.players_path);
    info!(
        "   Search: {} attempts, {} per attempt",
        config.matchmaking.max_retries, config.matchmaking.skill_difference_per_retry
    );
    info!(
        "   Weights: queue time {}, score difference {}, both unranked {}, both ranked {}, one ranked {}",
        config.scoring.queue_time_weight,
        config.scoring.total_score_difference_weight,
        config.scoring.both_unranked_weight,
        config.scoring.both_ranked_weight,
        config.scoring.only_one_ranked_weight
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(port) = args.port {
        config.service.port = port;
    }

    if let Some(players) = &args.players {
        config.store.players_path = players.clone();
    }

    duel_finder::config::validate_config(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Some(config_path) = &args.config {
        info!("Loaded configuration from: {}", config_path.display());
    }

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        info!("Dry run completed - exiting without starting service");
        return Ok(());
    }

    display_startup_banner(&config);

    info!("Initializing service components...");
    let app_state = match AppState::new(config.clone()) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let server = HttpServer::new(app_state);
    let shutdown = server.shutdown_handle();
    let mut server_task = tokio::spawn(server.start());

    info!("Duel Finder Matchmaking Service is running");
    info!("Press Ctrl+C to shutdown gracefully...");

    tokio::select! {
        _ = wait_for_shutdown_signal() => {
            info!("Shutdown signal received, beginning graceful shutdown...");
            if shutdown.send(()).is_err() {
                warn!("HTTP server already stopped");
            }
        }
        result = &mut server_task => {
            match result {
                Ok(Ok(())) => warn!("HTTP server exited unexpectedly"),
                Ok(Err(e)) => error!("HTTP server failed: {}", e),
                Err(e) => error!("HTTP server task panicked: {}", e),
            }
            std::process::exit(1);
        }
    }

    match tokio::time::timeout(config.shutdown_timeout(), server_task).await {
        Ok(Ok(Ok(()))) => info!("Graceful shutdown completed successfully"),
        Ok(Ok(Err(e))) => error!("HTTP server failed during shutdown: {}", e),
        Ok(Err(e)) => error!("HTTP server task panicked: {}", e),
        Err(_) => warn!("Shutdown timeout exceeded, forcing exit"),
    }

    info!("Duel Finder Matchmaking Service stopped");
    Ok(())
}
