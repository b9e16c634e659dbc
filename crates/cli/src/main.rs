//! Operator CLI for the comandos record store.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use comandos_core::config::{StoreConfig, strip_quotes};
use comandos_store::{MigrationReport, copy_commands};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "comandosctl")]
#[command(about = "Operator CLI for the comandos record store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct SourceArgs {
    /// SQLite database to read from
    #[arg(long, default_value = "comandos.db")]
    source: PathBuf,
}

#[derive(Args, Clone, Debug)]
struct TargetArgs {
    /// PostgreSQL connection URL of the target store
    #[arg(long, env = "DATABASE_URL")]
    target_url: Option<String>,

    /// SQLite database file of the target store (wins over --target-url)
    #[arg(long)]
    target_sqlite: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the target store contents with every command in the source
    Migrate {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// List the distinct topics in a store
    Topics {
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Build the source store config. An absent file is an error rather than a
/// fresh, empty database.
fn source_config(args: &SourceArgs) -> Result<StoreConfig> {
    let path = PathBuf::from(strip_quotes(&args.source.to_string_lossy()));
    if !path.exists() {
        bail!("source database not found: {}", path.display());
    }
    Ok(StoreConfig::sqlite(path))
}

fn target_config(args: &TargetArgs) -> Result<StoreConfig> {
    if let Some(path) = &args.target_sqlite {
        return Ok(StoreConfig::sqlite(path));
    }
    match args.target_url.as_deref().map(strip_quotes) {
        Some(url) if !url.is_empty() => Ok(StoreConfig::postgres_url(url)),
        _ => bail!("a target is required: pass --target-url, set DATABASE_URL or pass --target-sqlite"),
    }
}

async fn handle_migrate(source: &SourceArgs, target: &TargetArgs) -> Result<MigrationReport> {
    let source_config = source_config(source)?;
    let target_config = target_config(target)?;

    let source_store = comandos_store::from_config(&source_config)
        .await
        .context("failed to open source store")?;
    let target_store = comandos_store::from_config(&target_config)
        .await
        .context("failed to open target store")?;
    target_store
        .health_check()
        .await
        .context("target store health check failed")?;

    tracing::info!(
        source = %source.source.display(),
        target = target_config.backend_name(),
        "Starting migration"
    );
    let report = copy_commands(source_store.as_ref(), target_store.as_ref())
        .await
        .context("migration failed")?;
    Ok(report)
}

async fn handle_topics(source: &SourceArgs) -> Result<Vec<String>> {
    let store = comandos_store::from_config(&source_config(source)?)
        .await
        .context("failed to open store")?;
    Ok(store.list_topics().await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let Cli { command } = Cli::parse();

    match command {
        Commands::Migrate { source, target } => {
            let report = handle_migrate(&source, &target).await?;
            if report.is_noop() {
                println!("Source is empty, target left untouched.");
            } else {
                println!(
                    "Migrated {} command(s) ({} removed from target).",
                    report.inserted, report.truncated
                );
            }
            Ok(())
        }
        Commands::Topics { source } => {
            for topic in handle_topics(&source).await? {
                println!("{topic}");
            }
            Ok(())
        }
    }
}
