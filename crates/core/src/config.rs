//! Configuration types shared across crates.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// API key guard configuration.
///
/// The guard protects create, update and delete. With `enabled` set and no
/// `api_key` configured every write is rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether write routes require the API key.
    #[serde(default = "default_auth_enabled")]
    pub enabled: bool,
    /// Shared secret compared verbatim with the request header.
    /// WARNING: Prefer the API_KEY env var over storing it in a config file.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Name of the header carrying the key.
    #[serde(default = "default_header_name")]
    pub header_name: String,
}

fn default_auth_enabled() -> bool {
    true
}

fn default_header_name() -> String {
    crate::DEFAULT_API_KEY_HEADER.to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: default_auth_enabled(),
            api_key: None,
            header_name: default_header_name(),
        }
    }
}

impl AuthConfig {
    /// Create a test configuration with a fixed key.
    ///
    /// **For testing only.**
    pub fn for_testing() -> Self {
        Self {
            api_key: Some("test-api-key".to_string()),
            ..Default::default()
        }
    }
}

/// PostgreSQL SSL mode configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PgSslMode {
    /// Disable SSL/TLS entirely.
    Disable,
    /// Prefer SSL/TLS but allow unencrypted connections (default).
    #[default]
    Prefer,
    /// Require SSL/TLS for all connections.
    Require,
}

/// Record store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Local SQLite database file.
    Sqlite {
        /// Database file path (`:memory:` for an in-memory database).
        path: PathBuf,
    },
    /// Hosted PostgreSQL database.
    Postgres {
        /// Connection URL. Takes precedence over the individual fields.
        url: Option<String>,
        host: Option<String>,
        #[serde(default = "default_pg_port")]
        port: Option<u16>,
        username: Option<String>,
        /// WARNING: Prefer DATABASE_URL or COMANDOS_STORE__PASSWORD over a config file.
        password: Option<String>,
        database: Option<String>,
        ssl_mode: Option<PgSslMode>,
        /// Maximum connections in the pool.
        #[serde(default = "default_max_connections")]
        max_connections: u32,
        /// Server-side statement timeout in milliseconds.
        #[serde(default = "default_statement_timeout_ms")]
        statement_timeout_ms: Option<u64>,
    },
}

fn default_pg_port() -> Option<u16> {
    Some(5432)
}

fn default_max_connections() -> u32 {
    10
}

fn default_statement_timeout_ms() -> Option<u64> {
    Some(300_000)
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("comandos.db"),
        }
    }
}

impl StoreConfig {
    /// PostgreSQL store reached through a connection URL, with default pool settings.
    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres {
            url: Some(url.into()),
            host: None,
            port: default_pg_port(),
            username: None,
            password: None,
            database: None,
            ssl_mode: None,
            max_connections: default_max_connections(),
            statement_timeout_ms: default_statement_timeout_ms(),
        }
    }

    /// SQLite store at `path`.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self::Sqlite {
            path: path.into(),
        }
    }

    /// Short backend name for logs.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite",
            Self::Postgres { .. } => "postgres",
        }
    }

    /// Validate store configuration invariants.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Sqlite { path, .. } => {
                if path.as_os_str().is_empty() {
                    return Err(Error::Config("sqlite path must not be empty".to_string()));
                }
                Ok(())
            }
            Self::Postgres {
                url,
                host,
                database,
                ..
            } => match (url.as_ref(), host.as_ref(), database.as_ref()) {
                (Some(_), _, _) => Ok(()),
                (None, Some(_), Some(_)) => Ok(()),
                (None, None, _) => Err(Error::Config(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                )),
                (None, Some(_), None) => Err(Error::Config(
                    "postgres config requires 'database' when using individual fields".to_string(),
                )),
            },
        }
    }

    fn normalize(&mut self) {
        match self {
            Self::Sqlite { path, .. } => {
                if let Some(raw) = path.to_str() {
                    *path = PathBuf::from(strip_quotes(raw));
                }
            }
            Self::Postgres {
                url,
                host,
                username,
                password,
                database,
                ..
            } => {
                for value in [url, host, username, password, database] {
                    normalize_opt(value);
                }
            }
        }
    }
}

/// Full application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Create a test configuration: SQLite store, guard enabled with a fixed key.
    ///
    /// **For testing only.**
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            auth: AuthConfig::for_testing(),
        }
    }

    /// Apply the conventional deployment variables on top of the loaded config.
    ///
    /// `DATABASE_URL` switches the store to PostgreSQL, `API_KEY` sets the
    /// secret and `API_KEY_NAME` the header name.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.store = match std::mem::take(&mut self.store) {
                StoreConfig::Postgres {
                    host,
                    port,
                    username,
                    password,
                    database,
                    ssl_mode,
                    max_connections,
                    statement_timeout_ms,
                    ..
                } => StoreConfig::Postgres {
                    url: Some(url),
                    host,
                    port,
                    username,
                    password,
                    database,
                    ssl_mode,
                    max_connections,
                    statement_timeout_ms,
                },
                StoreConfig::Sqlite { .. } => StoreConfig::postgres_url(url),
            };
        }
        if let Some(key) = lookup("API_KEY") {
            self.auth.api_key = Some(key);
        }
        if let Some(name) = lookup("API_KEY_NAME") {
            self.auth.header_name = name;
        }
    }

    /// Strip one pair of surrounding quotes from every string value.
    pub fn normalize(&mut self) {
        self.server.bind = strip_quotes(&self.server.bind).to_string();
        self.auth.header_name = strip_quotes(&self.auth.header_name).to_string();
        normalize_opt(&mut self.auth.api_key);
        self.store.normalize();
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<()> {
        self.server
            .bind
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("invalid bind address '{}': {e}", self.server.bind)))?;
        if self.auth.header_name.trim().is_empty() {
            return Err(Error::Config("auth.header_name must not be empty".to_string()));
        }
        self.store.validate()
    }
}

/// Remove one matching pair of quotes wrapping a value, as left behind by
/// `.env` files. Anything else, whitespace included, is kept as is.
pub fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn normalize_opt(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        *v = strip_quotes(v).to_string();
    }
}
