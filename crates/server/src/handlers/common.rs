//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use axum::body::Body;
use comandos_core::CommandInput;
use serde::{Deserialize, Serialize};

/// `?nome=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct NameFilter {
    pub nome: Option<String>,
}

impl NameFilter {
    pub fn as_deref(&self) -> Option<&str> {
        self.nome.as_deref()
    }
}

/// Body for plain confirmation and welcome responses.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub mensagem: String,
}

impl MessageResponse {
    pub fn new(mensagem: impl Into<String>) -> Self {
        Self {
            mensagem: mensagem.into(),
        }
    }
}

/// Parse a command ID path segment.
pub fn parse_command_id(raw: &str) -> ApiResult<i32> {
    raw.parse::<i32>()
        .map_err(|e| ApiError::BadRequest(format!("invalid command ID '{raw}': {e}")))
}

/// Read and parse a command body, capped at `limit` bytes.
pub async fn read_command_input(body: Body, limit: usize) -> ApiResult<CommandInput> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
    Ok(CommandInput::from_json(&bytes)?)
}
