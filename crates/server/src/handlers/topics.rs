//! Topic endpoints.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use comandos_core::GroupedCommands;

/// GET /topicos
pub async fn list_topics(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.store.list_topics().await?))
}

/// GET /comandos/agrupados
pub async fn grouped_commands(State(state): State<AppState>) -> ApiResult<Json<GroupedCommands>> {
    Ok(Json(state.store.grouped_by_topic().await?))
}
