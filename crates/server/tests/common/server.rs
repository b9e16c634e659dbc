//! Server test utilities.

use comandos_core::CommandInput;
use comandos_core::config::{AppConfig, StoreConfig};
use comandos_store::models::CommandRow;
use comandos_store::{CommandStore, SqliteStore};
use comandos_server::{AppState, create_router};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// API key accepted by servers built with the default test config.
#[allow(dead_code)]
pub const TEST_API_KEY: &str = "test-api-key";

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server backed by a temporary SQLite file.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server after letting `modify` adjust the test config.
    ///
    /// The store is built from the final `config.store`, which defaults to a
    /// SQLite file inside the server's temp directory.
    pub async fn with_config<F>(modify: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("comandos.db");

        let mut config = AppConfig::for_testing();
        config.store = StoreConfig::sqlite(&db_path);
        modify(&mut config);

        let store = comandos_store::from_config(&config.store)
            .await
            .expect("Failed to create record store");

        let state = AppState::new(config, store).expect("Failed to build app state");
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get the record store directly.
    pub fn store(&self) -> &Arc<dyn CommandStore> {
        &self.state.store
    }

    /// Path of the SQLite file backing this server, if it uses one.
    pub fn sqlite_path(&self) -> Option<PathBuf> {
        match &self.state.config.store {
            StoreConfig::Sqlite { path } => Some(path.clone()),
            StoreConfig::Postgres { .. } => None,
        }
    }

    /// Drop the command table behind the server's back, so every later
    /// query fails inside the store.
    pub async fn drop_command_table(&self) {
        let path = self.sqlite_path().expect("server is not backed by SQLite");
        let side = SqliteStore::new(&path)
            .await
            .expect("Failed to open second connection");
        comandos_store::sqlx::query("DROP TABLE comandos")
            .execute(side.pool())
            .await
            .expect("Failed to drop command table");
    }

    /// Insert a command without going through HTTP.
    pub async fn seed(&self, topico: &str, nome: &str) -> CommandRow {
        self.store()
            .create_command(&CommandInput::new(topico).with_nome(nome))
            .await
            .expect("Failed to seed command")
    }
}
