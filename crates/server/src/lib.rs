//! HTTP API server for the comandos command reference.
//!
//! This crate provides the HTTP facade:
//! - Read endpoints for commands, topics and the grouped view
//! - Create, update and delete guarded by an API key header
//! - Mapping of store errors to status codes

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{ApiKeyGuard, TraceId};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
