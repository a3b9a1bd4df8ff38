//! Booking trigger webhook.
//!
//! The hosting platform posts every booking write here. Retryable failures
//! answer 503 so the platform redelivers; everything else answers 200.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use subtle::ConstantTimeEq;

use agrirent_core::error::AppError;
use agrirent_notify::TriggerInput;

use crate::dto::response::TriggerResponse;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::state::AppState;

/// Header carrying the shared webhook secret.
pub const SECRET_HEADER: &str = "x-trigger-secret";

/// POST /internal/triggers/bookings
pub async fn booking_written(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(input): ApiJson<TriggerInput>,
) -> Result<(StatusCode, Json<TriggerResponse>), ApiError> {
    if let Some(expected) = state.config.trigger.webhook_secret.as_deref() {
        let presented = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if !secret_matches(expected, presented) {
            return Err(AppError::authentication("Invalid trigger secret").into());
        }
    }

    let outcome = state.trigger.handle(&input).await;
    let status = if outcome.is_retryable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    Ok((status, Json(TriggerResponse::from(&outcome))))
}

/// Compare the presented secret without leaking how much of it matched.
fn secret_matches(expected: &str, presented: Option<&str>) -> bool {
    presented.is_some_and(|presented| expected.as_bytes().ct_eq(presented.as_bytes()).into())
}
