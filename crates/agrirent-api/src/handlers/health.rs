//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (store, claims) = tokio::join!(state.store.health_check(), state.claims.health_check());
    let store = store.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Document store health check failed");
        false
    });
    let claims = claims.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Claim store health check failed");
        false
    });

    Json(HealthResponse {
        status: if store && claims { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store,
        claims,
    })
}
