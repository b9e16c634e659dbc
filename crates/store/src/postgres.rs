//! PostgreSQL-based record store implementation.

use crate::error::{StoreError, StoreResult};
use crate::models::CommandRow;
use crate::repos::{CommandRepo, commands::non_empty, contains_pattern};
use crate::store::CommandStore;
use async_trait::async_trait;
use comandos_core::CommandInput;
use comandos_core::config::PgSslMode;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::{Pool, Postgres};
use std::str::FromStr;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

fn postgres_schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .filter_map(|statement| {
            let trimmed = statement.trim();
            if trimmed.is_empty() {
                return None;
            }
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            has_sql.then_some(trimmed)
        })
        .collect()
}

/// PostgreSQL-based record store.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(
        url: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    /// Create a new PostgreSQL store from individual connection parameters.
    #[allow(clippy::too_many_arguments)]
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        ssl_mode: Option<PgSslMode>,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }

        if let Some(pass) = password {
            opts = opts.password(pass);
        }

        if let Some(mode) = ssl_mode {
            let sqlx_mode = match mode {
                PgSslMode::Disable => SqlxPgSslMode::Disable,
                PgSslMode::Prefer => SqlxPgSslMode::Prefer,
                PgSslMode::Require => SqlxPgSslMode::Require,
            };
            opts = opts.ssl_mode(sqlx_mode);
        }

        // Log connection info without password
        tracing::info!(
            host = host,
            port = port,
            database = database,
            username = username.unwrap_or("<none>"),
            ssl_mode = ?ssl_mode,
            "Connecting to PostgreSQL with individual parameters"
        );

        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    async fn connect(
        mut opts: PgConnectOptions,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        if let Some(timeout_ms) = statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{}ms", timeout_ms))]);
            tracing::info!("PostgreSQL statement_timeout set to {}ms", timeout_ms);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl CommandStore for PostgresStore {
    async fn migrate(&self) -> StoreResult<()> {
        // Prepared statements cannot hold several commands, so run them one by one.
        for statement in postgres_schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CommandRepo for PostgresStore {
    async fn list_commands(&self, name_filter: Option<&str>) -> StoreResult<Vec<CommandRow>> {
        let rows = match non_empty(name_filter) {
            Some(name) => {
                sqlx::query_as::<_, CommandRow>(
                    "SELECT * FROM comandos WHERE nome ILIKE $1 ORDER BY topico, nome, id",
                )
                .bind(contains_pattern(name))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CommandRow>("SELECT * FROM comandos ORDER BY topico, nome, id")
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
                    "SELECT * FROM comandos WHERE topico ILIKE $1 AND nome ILIKE $2 ORDER BY topico, nome, id",
                )
                .bind(contains_pattern(topic))
                .bind(contains_pattern(name))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CommandRow>(
                    "SELECT * FROM comandos WHERE topico ILIKE $1 ORDER BY topico, nome, id",
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
        let rows = sqlx::query_as::<_, CommandRow>("SELECT * FROM comandos ORDER BY topico, id")
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
        let row = sqlx::query_as::<_, CommandRow>("SELECT * FROM comandos WHERE id = $1")
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
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
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
                topico = $1, nome = $2, categoria = $3, definicao = $4,
                comando_exemplo = $5, explicacao_pratica = $6, dicas_de_uso = $7
            WHERE id = $8
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
        let result = sqlx::query("DELETE FROM comandos WHERE id = $1")
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
        // TRUNCATE reports no row count.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comandos")
            .fetch_one(&mut *tx)
            .await?;
        sqlx::query("TRUNCATE TABLE comandos RESTART IDENTITY")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(count as u64)
    }
}
