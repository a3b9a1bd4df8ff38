//! Push token registration.

use axum::Json;
use axum::extract::State;

use crate::dto::request::RegisterPushTokenRequest;
use crate::dto::response::SuccessResponse;
use crate::error::ApiError;
use crate::extractors::{ApiJson, MaybeAuthUser};
use crate::state::AppState;

/// POST /api/push-tokens
pub async fn register(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    ApiJson(req): ApiJson<RegisterPushTokenRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .callables
        .register_push_token(caller.user(), req.token.as_deref())
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
