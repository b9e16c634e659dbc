//! Welcome and health endpoints.

use crate::error::ApiResult;
use crate::handlers::common::MessageResponse;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Welcome text returned by `GET /`.
pub const WELCOME_MESSAGE: &str = "Bem-vindo à API de Comandos!";

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(WELCOME_MESSAGE))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub comandos: u64,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.store.health_check().await?;
    let comandos = state.store.count_commands().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        backend: state.config.store.backend_name(),
        comandos,
    }))
}
