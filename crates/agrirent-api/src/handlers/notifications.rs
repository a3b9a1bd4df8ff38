//! Custom notifications and the caller's inbox.

use axum::Json;
use axum::extract::{Path, Query, State};

use agrirent_core::types::{NotificationId, UserId};
use agrirent_notify::CustomNotificationRequest;

use crate::dto::request::{ListNotificationsQuery, SendNotificationRequest};
use crate::dto::response::{NotificationView, SendNotificationResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, MaybeAuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/notifications/send
pub async fn send(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    ValidatedJson(req): ValidatedJson<SendNotificationRequest>,
) -> Result<Json<SendNotificationResponse>, ApiError> {
    let request = CustomNotificationRequest {
        target_user_id: UserId::new(req.target_user_id.unwrap_or_default()),
        title: req.title.unwrap_or_default(),
        body: req.body.unwrap_or_default(),
        data: req.data,
    };
    let result = state
        .callables
        .send_custom_notification(caller.user(), request)
        .await?;
    Ok(Json(result.into()))
}

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<Vec<NotificationView>>, ApiError> {
    let notifications = state.inbox.list(&auth, query.limit).await?;
    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<NotificationView>, ApiError> {
    let notification = state
        .inbox
        .mark_read(&auth, &NotificationId::new(id))
        .await?;
    Ok(Json(notification.into()))
}
