//! Route configuration.

use crate::auth::auth_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        // Health check (unauthenticated for load balancers/probes)
        .route("/health", get(handlers::health_check))
        .route(
            "/comandos",
            get(handlers::list_commands).post(handlers::create_command),
        )
        // Static segments win over `/comandos/{id}`
        .route("/comandos/agrupados", get(handlers::grouped_commands))
        .route(
            "/comandos/topico/{topic}",
            get(handlers::list_commands_by_topic),
        )
        .route(
            "/comandos/{id}",
            get(handlers::get_command)
                .put(handlers::update_command)
                .delete(handlers::delete_command),
        )
        .route("/topicos", get(handlers::list_topics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
