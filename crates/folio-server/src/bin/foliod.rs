//! Folio Server Daemon
//!
//! The `foliod` binary is the Folio server process that:
//! - Builds the author/article schema and an empty in-memory store
//! - Serves the HTTP API
//! - Handles graceful shutdown on SIGTERM/SIGINT
//!
//! # Usage
//!
//! ```bash
//! # Start server with default settings (0.0.0.0:8080)
//! foliod
//!
//! # Start on custom port
//! foliod --port 9090
//!
//! # Use configuration file
//! foliod --config /etc/folio/foliod.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use folio_server::api::{create_router, AppState};
use folio_server::config::ServerConfig;

/// Folio Server Daemon
#[derive(Parser, Debug)]
#[command(
    name = "foliod",
    author = "Folio Team",
    version,
    about = "Folio author/article server",
    long_about = "Folio keeps authors and articles in an indexed, transactional in-memory store.\n\n\
                  This daemon starts the store and serves its HTTP API."
)]
struct Args {
    /// Host address to bind to
    #[arg(short = 'H', long, env = "FOLIO_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long, env = "FOLIO_PORT")]
    port: Option<u16>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "FOLIO_LOG_LEVEL")]
    log_level: Option<String>,

    /// Deadline in milliseconds for acquiring the write lock
    #[arg(long, value_name = "MS", env = "FOLIO_WRITE_TIMEOUT_MS")]
    write_timeout_ms: Option<u64>,

    /// Print configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = load_config(&args)?;

    // Print config and exit if requested
    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    init_logging(&args, &config);

    run_server(config).await
}

fn init_logging(args: &Args, config: &ServerConfig) {
    let level = if args.verbose {
        "debug"
    } else {
        &config.log_level
    };

    let filter = EnvFilter::try_new(format!(
        "folio_server={level},folio_store={level},foliod={level}"
    ))
    .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn load_config(args: &Args) -> Result<ServerConfig> {
    // Start with defaults
    let mut config = if let Some(path) = &args.config {
        ServerConfig::from_file(path).context("Failed to load config file")?
    } else {
        ServerConfig::default()
    };

    // Override with command-line arguments
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if let Some(ms) = args.write_timeout_ms {
        config.write_timeout_ms = Some(ms);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn run_server(config: ServerConfig) -> Result<()> {
    let addr = config.parsed_addr().context("Invalid server address")?;

    let state = AppState::from_config(&config).context("Failed to build store schema")?;
    let state = Arc::new(state);
    let store = Arc::clone(&state.store);

    info!("Server configuration:");
    info!("  Listen address: {}", addr);
    match config.write_timeout_ms {
        Some(ms) => info!("  Write lock deadline: {} ms", ms),
        None => info!("  Write lock deadline: none"),
    }

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Folio v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);
    info!("Press Ctrl+C to shutdown");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let stats = store.stats();
    info!(
        commits = stats.commits,
        aborts = stats.aborts,
        reads = stats.read_txns,
        "Server stopped. Goodbye!"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
