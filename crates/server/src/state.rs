//! Application state shared across handlers.

use crate::auth::ApiKeyGuard;
use crate::error::ApiResult;
use comandos_core::config::AppConfig;
use comandos_store::CommandStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, fixed at startup.
    pub config: Arc<AppConfig>,
    /// Record store.
    pub store: Arc<dyn CommandStore>,
    /// API key guard for write routes.
    pub guard: Arc<ApiKeyGuard>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Logs warnings for guard settings that leave writes open or closed to everyone.
    pub fn new(config: AppConfig, store: Arc<dyn CommandStore>) -> ApiResult<Self> {
        let guard = ApiKeyGuard::from_config(&config.auth)?;

        if !guard.is_enabled() {
            tracing::warn!("API key guard disabled: write routes are open to every caller");
        } else if !guard.has_secret() {
            tracing::warn!("No API key configured: every write request will be rejected");
        }

        Ok(Self {
            config: Arc::new(config),
            store,
            guard: Arc::new(guard),
        })
    }
}
