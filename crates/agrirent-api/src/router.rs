//! Route definitions for the AgriRent HTTP API.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use agrirent_core::config::ServerConfig;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds.max(1));

    let api_routes = Router::new()
        .merge(callable_routes())
        .merge(notification_routes())
        .merge(booking_routes());

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api", api_routes)
        .merge(internal_routes())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn callable_routes() -> Router<AppState> {
    Router::new()
        .route("/push-tokens", post(handlers::push_tokens::register))
        .route("/notifications/send", post(handlers::notifications::send))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notifications::list))
        .route(
            "/notifications/{id}/read",
            post(handlers::notifications::mark_read),
        )
}

fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(handlers::bookings::create))
        .route(
            "/bookings/{id}/status",
            post(handlers::bookings::update_status),
        )
}

/// Platform-facing endpoints, guarded by the trigger secret.
fn internal_routes() -> Router<AppState> {
    Router::new().route(
        "/internal/triggers/bookings",
        post(handlers::triggers::booking_written),
    )
}

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    if config.allows_any_origin() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}
