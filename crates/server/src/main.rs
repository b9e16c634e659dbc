//! Comandos server binary.

use anyhow::{Context, Result};
use clap::Parser;
use comandos_core::config::AppConfig;
use comandos_server::{AppState, create_router};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Comandos - command reference API
#[derive(Parser, Debug)]
#[command(name = "comandosd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (optional; env vars can provide everything)
    #[arg(
        short,
        long,
        env = "COMANDOS_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

/// Load configuration from the optional file, `COMANDOS_` env vars and the
/// conventional deployment variables, in that order of precedence.
fn load_config<F>(config_path: &Path, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut figment = Figment::new();

    if config_path.exists() {
        tracing::info!(config_path = %config_path.display(), "Loading configuration from file");
        figment = figment.merge(Toml::file(config_path));
    } else {
        tracing::debug!("No config file found at {}", config_path.display());
    }

    let mut config: AppConfig = figment
        .merge(Env::prefixed("COMANDOS_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    config.apply_env_overrides(lookup);
    config.normalize();
    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Comandos v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(Path::new(&args.config), |key| std::env::var(key).ok())?;

    let store = comandos_store::from_config(&config.store)
        .await
        .context("failed to initialize record store")?;
    store
        .health_check()
        .await
        .context("record store health check failed")?;
    tracing::info!(backend = config.store.backend_name(), "Record store initialized");

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    let state = AppState::new(config, store).context("failed to build application state")?;
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
