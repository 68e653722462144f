//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// GET /health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    Json(DetailedHealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        connections: state.relay.connection_count(),
        online_users: state.relay.online_users(),
        logged_messages: state.relay.message_count().await,
    })
}
