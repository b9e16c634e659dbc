//! Record store trait and the SQLite implementation.

use crate::error::{StoreError, StoreResult};
use crate::repos::CommandRepo;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined record store trait.
#[async_trait]
pub trait CommandStore: CommandRepo + Send + Sync {
    /// Create the schema if it does not exist.
    async fn migrate(&self) -> StoreResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> StoreResult<()>;
}

/// SQLite-based record store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `path`.
    pub async fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        // A single connection serializes writers and keeps `:memory:` databases alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::debug!(path = %path.display(), "SQLite store opened");

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl CommandStore for SqliteStore {
    async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

mod sqlite_impl {
    use super::*;
    use crate::models::CommandRow;
    use crate::repos::{commands::non_empty, contains_pattern};
    use comandos_core::CommandInput;

    #[async_trait]
    impl CommandRepo for SqliteStore {
        async fn list_commands(&self, name_filter: Option<&str>) -> StoreResult<Vec<CommandRow>> {
            let rows = match non_empty(name_filter) {
                Some(name) => {
                    sqlx::query_as::<_, CommandRow>(
                        "SELECT * FROM comandos WHERE nome LIKE ? ORDER BY topico, nome, id",
                    )
                    .bind(contains_pattern(name))
                    .fetch_all(&self.pool)
                    .await?
                }
                None => {
                    sqlx::query_as::<_, CommandRow>(
                        "SELECT * FROM comandos ORDER BY topico, nome, id",
                    )
                    .fetch_all(&self.pool)
                    .await?
                }
            };
            Ok(rows)
        }

        async fn list_commands_by_topic(
            &self,
            topic: &str,
            name_filter: Option<&str>,
        ) -> StoreResult<Vec<CommandRow>> {
            let rows = match non_empty(name_filter) {
                Some(name) => {
                    sqlx::query_as::<_, CommandRow>(
                        "SELECT * FROM comandos WHERE topico LIKE ? AND nome LIKE ? ORDER BY topico, nome, id",
                    )
                    .bind(contains_pattern(topic))
                    .bind(contains_pattern(name))
                    .fetch_all(&self.pool)
                    .await?
                }
                None => {
                    sqlx::query_as::<_, CommandRow>(
                        "SELECT * FROM comandos WHERE topico LIKE ? ORDER BY topico, nome, id",
                    )
                    .bind(contains_pattern(topic))
                    .fetch_all(&self.pool)
                    .await?
                }
            };
            Ok(rows)
        }

        async fn list_topics(&self) -> StoreResult<Vec<String>> {
            let topics: Vec<String> =
                sqlx::query_scalar("SELECT DISTINCT topico FROM comandos ORDER BY topico")
                    .fetch_all(&self.pool)
                    .await?;
            Ok(topics)
        }

        async fn list_commands_by_topic_and_id(&self) -> StoreResult<Vec<CommandRow>> {
            let rows =
                sqlx::query_as::<_, CommandRow>("SELECT * FROM comandos ORDER BY topico, id")
                    .fetch_all(&self.pool)
                    .await?;
            Ok(rows)
        }

        async fn list_commands_by_id(&self) -> StoreResult<Vec<CommandRow>> {
            let rows = sqlx::query_as::<_, CommandRow>("SELECT * FROM comandos ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }

        async fn get_command(&self, id: i32) -> StoreResult<Option<CommandRow>> {
            let row = sqlx::query_as::<_, CommandRow>("SELECT * FROM comandos WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn count_commands(&self) -> StoreResult<u64> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comandos")
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }

        async fn create_command(&self, input: &CommandInput) -> StoreResult<CommandRow> {
            let mut tx = self.pool.begin().await?;
            let row = sqlx::query_as::<_, CommandRow>(
                r#"
                INSERT INTO comandos (
                    topico, nome, categoria, definicao,
                    comando_exemplo, explicacao_pratica, dicas_de_uso
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(&input.topico)
            .bind(&input.nome)
            .bind(&input.categoria)
            .bind(&input.definicao)
            .bind(&input.comando_exemplo)
            .bind(&input.explicacao_pratica)
            .bind(&input.dicas_de_uso)
            .fetch_one(&mut *tx)
            .await?;
            tx.commit().await?;
            Ok(row)
        }

        async fn update_command(&self, id: i32, input: &CommandInput) -> StoreResult<CommandRow> {
            let mut tx = self.pool.begin().await?;
            let row = sqlx::query_as::<_, CommandRow>(
                r#"
                UPDATE comandos SET
                    topico = ?, nome = ?, categoria = ?, definicao = ?,
                    comando_exemplo = ?, explicacao_pratica = ?, dicas_de_uso = ?
                WHERE id = ?
                RETURNING *
                "#,
            )
            .bind(&input.topico)
            .bind(&input.nome)
            .bind(&input.categoria)
            .bind(&input.definicao)
            .bind(&input.comando_exemplo)
            .bind(&input.explicacao_pratica)
            .bind(&input.dicas_de_uso)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(row) = row else {
                return Err(StoreError::command_not_found(id));
            };
            tx.commit().await?;
            Ok(row)
        }

        async fn delete_command(&self, id: i32) -> StoreResult<()> {
            let mut tx = self.pool.begin().await?;
            let result = sqlx::query("DELETE FROM comandos WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::command_not_found(id));
            }
            tx.commit().await?;
            Ok(())
        }

        async fn truncate_commands(&self) -> StoreResult<u64> {
            let mut tx = self.pool.begin().await?;
            let result = sqlx::query("DELETE FROM comandos")
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'comandos'")
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok(result.rows_affected())
        }
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS comandos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    topico TEXT NOT NULL,
    nome TEXT,
    categoria TEXT,
    definicao TEXT,
    comando_exemplo TEXT,
    explicacao_pratica TEXT,
    dicas_de_uso TEXT
);
CREATE INDEX IF NOT EXISTS idx_comandos_topico_nome ON comandos(topico, nome);
"#;
