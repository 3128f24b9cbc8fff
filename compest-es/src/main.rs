//! Estimate Service (compest-es) - Main entry point
//!
//! Resolves configuration, builds the comp source and result store, and
//! serves the estimate API until Ctrl+C or SIGTERM.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use compest_common::config::{ConfigOverrides, ConfigResolver};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use compest_es::sources::build_comp_source;
use compest_es::store::open_store;
use compest_es::{build_router, AppState};

/// Command-line arguments for compest-es
///
/// Each flag overrides the matching environment variable and config file
/// entry.
#[derive(Parser, Debug)]
#[command(name = "compest-es")]
#[command(about = "Comparable-sales property estimate service")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, e.g. 127.0.0.1:5740
    #[arg(short, long)]
    bind: Option<String>,

    /// SQLite database URL or path; omit for an in-memory store
    #[arg(long)]
    database_url: Option<String>,

    /// Comp provider: synthetic (alias fake) or file
    #[arg(short, long)]
    provider: Option<String>,

    /// JSON comp list for the file provider
    #[arg(long)]
    comps_file: Option<PathBuf>,

    /// Pin the recency reference date (YYYY-MM-DD)
    #[arg(long)]
    reference_date: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging starts at the default level and is narrowed once config resolves
    let rust_log_set = std::env::var(EnvFilter::DEFAULT_ENV).is_ok();
    let (filter, filter_handle) = reload::Layer::new(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| service_filter("info")),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!(
        "Starting compest-es v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let resolver = ConfigResolver::new(args.config.clone());
    let config = resolver
        .resolve(ConfigOverrides {
            bind_address: args.bind,
            database_url: args.database_url,
            provider: args.provider,
            comps_file: args.comps_file,
            reference_date: args.reference_date,
            log_level: args.log_level,
        })
        .context("Failed to resolve configuration")?;

    if !rust_log_set {
        filter_handle
            .reload(service_filter(&config.log_level))
            .context("Failed to apply log level")?;
    }

    info!(
        provider = %config.provider,
        radius_km = config.search.radius_km,
        days = config.search.days,
        reference_date = ?config.reference_date,
        "Configuration resolved"
    );

    let comp_source = build_comp_source(&config).context("Failed to build comp source")?;
    let store = open_store(config.database_url.as_deref())
        .await
        .context("Failed to open result store")?;

    let app = build_router(AppState::from_config(&config, comp_source, store));

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;
    info!("Listening on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Filter applying `level` to this service's crates and the HTTP trace layer
fn service_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!(
        "compest_es={level},compest_common={level},tower_http={level}",
        level = level
    ))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
