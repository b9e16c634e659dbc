//! Record store abstraction and implementations for the comandos service.
//!
//! One table of commands, reachable through the [`CommandStore`] trait and
//! backed by either an embedded SQLite file or a PostgreSQL server.

pub mod error;
pub mod migration;
pub mod models;
pub mod postgres;
pub mod repos;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use migration::{MigrationReport, copy_commands};
pub use postgres::PostgresStore;
pub use repos::CommandRepo;
pub use store::{CommandStore, SqliteStore};

pub use sqlx;

use comandos_core::config::StoreConfig;
use std::sync::Arc;

/// Create a record store from configuration.
pub async fn from_config(config: &StoreConfig) -> StoreResult<Arc<dyn CommandStore>> {
    match config {
        StoreConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn CommandStore>)
        }
        StoreConfig::Postgres {
            url,
            host,
            port,
            username,
            password,
            database,
            ssl_mode,
            max_connections,
            statement_timeout_ms,
        } => {
            let store = if let Some(url) = url {
                tracing::info!("Connecting to PostgreSQL using connection URL");
                PostgresStore::from_url(url, *max_connections, *statement_timeout_ms).await?
            } else if let (Some(host), Some(database)) = (host.as_ref(), database.as_ref()) {
                PostgresStore::from_params(
                    host,
                    port.unwrap_or(5432),
                    username.as_deref(),
                    password.as_deref(),
                    database,
                    *ssl_mode,
                    *max_connections,
                    *statement_timeout_ms,
                )
                .await?
            } else {
                return Err(StoreError::Config(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ));
            };
            Ok(Arc::new(store) as Arc<dyn CommandStore>)
        }
    }
}
