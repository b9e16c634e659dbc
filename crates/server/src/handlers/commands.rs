//! Command endpoints.

use crate::auth::{get_trace_id, require_auth};
use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{MessageResponse, NameFilter, parse_command_id, read_command_input};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use comandos_core::Command;

/// Confirmation returned after a successful delete.
pub fn deleted_message(id: i32) -> String {
    format!("Comando com ID {id} foi deletado com sucesso")
}

fn to_commands(rows: Vec<comandos_store::models::CommandRow>) -> Vec<Command> {
    rows.into_iter().map(Command::from).collect()
}

/// GET /comandos?nome=
pub async fn list_commands(
    State(state): State<AppState>,
    Query(filter): Query<NameFilter>,
) -> ApiResult<Json<Vec<Command>>> {
    let rows = state.store.list_commands(filter.as_deref()).await?;
    Ok(Json(to_commands(rows)))
}

/// GET /comandos/topico/{topic}?nome=
///
/// No match is an empty list, not an error.
pub async fn list_commands_by_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    Query(filter): Query<NameFilter>,
) -> ApiResult<Json<Vec<Command>>> {
    let rows = state
        .store
        .list_commands_by_topic(&topic, filter.as_deref())
        .await?;
    Ok(Json(to_commands(rows)))
}

/// GET /comandos/{id}
pub async fn get_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Command>> {
    let id = parse_command_id(&id)?;
    let row = state
        .store
        .get_command(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("command {id} not found")))?;
    Ok(Json(row.into()))
}

/// POST /comandos
pub async fn create_command(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<Command>)> {
    require_auth(&req)?;
    let trace_id = get_trace_id(&req).map(|t| t.to_string());

    let input = read_command_input(req.into_body(), state.config.server.max_body_bytes).await?;
    let row = state.store.create_command(&input).await?;

    tracing::info!(id = row.id, topico = %row.topico, trace_id = ?trace_id, "Command created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// PUT /comandos/{id}
pub async fn update_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<Json<Command>> {
    require_auth(&req)?;
    let id = parse_command_id(&id)?;
    let trace_id = get_trace_id(&req).map(|t| t.to_string());

    let input = read_command_input(req.into_body(), state.config.server.max_body_bytes).await?;
    let row = state.store.update_command(id, &input).await?;

    tracing::info!(id = row.id, trace_id = ?trace_id, "Command updated");
    Ok(Json(row.into()))
}

/// DELETE /comandos/{id}
pub async fn delete_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<Json<MessageResponse>> {
    require_auth(&req)?;
    let id = parse_command_id(&id)?;
    let trace_id = get_trace_id(&req).map(|t| t.to_string());

    state.store.delete_command(id).await?;

    tracing::info!(id = id, trace_id = ?trace_id, "Command deleted");
    Ok(Json(MessageResponse::new(deleted_message(id))))
}
