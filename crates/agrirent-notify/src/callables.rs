//! Operations invoked directly by signed-in clients.

use std::collections::BTreeMap;

use tracing::info;

use agrirent_core::error::AppError;
use agrirent_core::result::AppResult;
use agrirent_core::types::UserId;
use agrirent_database::repositories::PushTokenRepository;
use agrirent_entity::notification::NotificationPayload;
use agrirent_entity::push_token::PushTokenRecord;
use agrirent_push::is_valid_push_token;

use crate::composer::ComposedNotification;
use crate::dispatcher::{DeliveryDispatcher, DeliveryResult};

/// A caller-authored notification for another user.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomNotificationRequest {
    pub target_user_id: UserId,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

/// Push token registration and custom notifications.
#[derive(Debug, Clone)]
pub struct CallableService {
    push_tokens: PushTokenRepository,
    dispatcher: DeliveryDispatcher,
}

impl CallableService {
    pub fn new(push_tokens: PushTokenRepository, dispatcher: DeliveryDispatcher) -> Self {
        Self {
            push_tokens,
            dispatcher,
        }
    }

    /// Store `token` as the caller's current push token, replacing any
    /// previous one.
    pub async fn register_push_token(
        &self,
        caller: Option<&UserId>,
        token: Option<&str>,
    ) -> AppResult<PushTokenRecord> {
        let caller = require_caller(caller)?;
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::validation("Token is required"))?;
        if !is_valid_push_token(token) {
            return Err(AppError::validation("Token is not a recognised push token"));
        }

        let record = self.push_tokens.upsert(caller, token).await?;
        info!(user_id = %caller, "Push token registered");
        Ok(record)
    }

    /// Deliver a custom notification to `request.target_user_id`.
    ///
    /// Any authenticated caller may target any user.
    pub async fn send_custom_notification(
        &self,
        caller: Option<&UserId>,
        request: CustomNotificationRequest,
    ) -> AppResult<DeliveryResult> {
        let caller = require_caller(caller)?;
        if request.target_user_id.is_blank() {
            return Err(AppError::validation("Target user is required"));
        }
        if request.title.trim().is_empty() || request.body.trim().is_empty() {
            return Err(AppError::validation("Title and body are required"));
        }

        let composed = ComposedNotification {
            recipient_id: request.target_user_id,
            title: request.title,
            body: request.body,
            payload: NotificationPayload::Custom(request.data),
        };
        let result = self.dispatcher.dispatch(&composed).await?;
        info!(
            sender_id = %caller,
            user_id = %composed.recipient_id,
            notification_id = %result.notification.id,
            "Custom notification sent"
        );
        Ok(result)
    }
}

fn require_caller(caller: Option<&UserId>) -> AppResult<&UserId> {
    caller
        .filter(|c| !c.is_blank())
        .ok_or_else(|| AppError::authentication("Authentication required"))
}
