//! Delivery of composed notifications: in-app record, then push.
//!
//! The in-app notification is authoritative and written first. Everything
//! after it (token lookup, relay calls, ticket inspection, pruning) is
//! best-effort: failures are logged per recipient and reported in the
//! [`DeliveryResult`], never returned as errors.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use agrirent_core::config::push::PushConfig;
use agrirent_core::error::AppError;
use agrirent_core::result::AppResult;
use agrirent_core::types::UserId;
use agrirent_database::repositories::{NotificationRepository, PushTokenRepository};
use agrirent_entity::notification::{NewNotification, Notification};
use agrirent_push::{MessageOutcome, PushMessage, PushRelay, PushTicket, is_valid_push_token, send_in_chunks};

use crate::composer::ComposedNotification;

/// Why no push message was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Push delivery is turned off.
    Disabled,
    /// The recipient has no registered token.
    NoToken,
    /// The registered token is not in a format the relay accepts.
    InvalidToken,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "push disabled",
            Self::NoToken => "no token",
            Self::InvalidToken => "invalid token",
        }
    }
}

/// Push side of one delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum PushStatus {
    /// No message was sent.
    Skipped(SkipReason),
    /// The relay accepted the message.
    Sent(PushTicket),
    /// The relay rejected the message; `pruned` is set when the stale
    /// token was removed.
    Rejected { ticket: PushTicket, pruned: bool },
    /// The message could not be submitted.
    Failed { error: String, retryable: bool },
}

/// Result of delivering one notification.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryResult {
    /// The persisted in-app notification.
    pub notification: Notification,
    pub push: PushStatus,
}

/// Writes in-app notifications and fans them out to the push relay.
#[derive(Debug, Clone)]
pub struct DeliveryDispatcher {
    notifications: NotificationRepository,
    push_tokens: PushTokenRepository,
    relay: Arc<dyn PushRelay>,
    config: PushConfig,
}

impl DeliveryDispatcher {
    pub fn new(
        notifications: NotificationRepository,
        push_tokens: PushTokenRepository,
        relay: Arc<dyn PushRelay>,
        config: PushConfig,
    ) -> Self {
        Self {
            notifications,
            push_tokens,
            relay,
            config,
        }
    }

    /// Deliver one notification.
    ///
    /// Only a failure to persist the in-app record is returned as an error.
    pub async fn dispatch(&self, composed: &ComposedNotification) -> AppResult<DeliveryResult> {
        let mut results = self.dispatch_all(std::slice::from_ref(composed)).await;
        match results.pop() {
            Some(result) => result,
            None => Err(AppError::internal("dispatch produced no result")),
        }
    }

    /// Deliver several notifications, sharing relay batches between them.
    ///
    /// Returns one result per input, in input order.
    pub async fn dispatch_all(&self, items: &[ComposedNotification]) -> Vec<AppResult<DeliveryResult>> {
        let mut results: Vec<AppResult<DeliveryResult>> = Vec::with_capacity(items.len());
        let mut outgoing: Vec<(usize, PushMessage)> = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let notification = match self.persist(item).await {
                Ok(n) => n,
                Err(e) => {
                    error!(
                        user_id = %item.recipient_id,
                        step = "persist",
                        error = %e,
                        "Failed to write in-app notification"
                    );
                    results.push(Err(e));
                    continue;
                }
            };

            let push = match self.resolve_token(&item.recipient_id).await {
                Ok(token) => {
                    outgoing.push((
                        index,
                        PushMessage::new(token, &item.title, &item.body, notification.data.clone()),
                    ));
                    PushStatus::Failed {
                        error: "not submitted".to_string(),
                        retryable: true,
                    }
                }
                Err(status) => status,
            };
            results.push(Ok(DeliveryResult { notification, push }));
        }

        if outgoing.is_empty() {
            return results;
        }

        let messages: Vec<PushMessage> = outgoing.iter().map(|(_, m)| m.clone()).collect();
        let outcomes = send_in_chunks(
            self.relay.as_ref(),
            &messages,
            self.config.effective_batch_size(),
        )
        .await;

        for ((index, _), outcome) in outgoing.iter().zip(outcomes) {
            let recipient = &items[*index].recipient_id;
            let status = self.inspect(recipient, outcome).await;
            if let Some(Ok(result)) = results.get_mut(*index) {
                result.push = status;
            }
        }

        results
    }

    async fn persist(&self, item: &ComposedNotification) -> AppResult<Notification> {
        let notification = self
            .notifications
            .create(&NewNotification {
                user_id: item.recipient_id.clone(),
                title: item.title.clone(),
                message: item.body.clone(),
                data: item.payload.to_data(),
            })
            .await?;
        debug!(
            user_id = %item.recipient_id,
            notification_id = %notification.id,
            kind = %item.payload.notification_type(),
            "In-app notification stored"
        );
        Ok(notification)
    }

    /// The recipient's deliverable token, or the push status explaining
    /// why there is none.
    async fn resolve_token(&self, recipient: &UserId) -> Result<String, PushStatus> {
        if !self.config.enabled {
            return Err(PushStatus::Skipped(SkipReason::Disabled));
        }

        let record = match self.push_tokens.find(recipient).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!(user_id = %recipient, "No push token, skipping push");
                return Err(PushStatus::Skipped(SkipReason::NoToken));
            }
            Err(e) => {
                warn!(user_id = %recipient, step = "token_lookup", error = %e, "Push token lookup failed");
                return Err(PushStatus::Failed {
                    error: e.to_string(),
                    retryable: e.is_retryable(),
                });
            }
        };

        if !is_valid_push_token(&record.token) {
            warn!(user_id = %recipient, "Stored push token has an invalid format, skipping push");
            return Err(PushStatus::Skipped(SkipReason::InvalidToken));
        }
        Ok(record.token)
    }

    async fn inspect(&self, recipient: &UserId, outcome: MessageOutcome) -> PushStatus {
        match outcome.result {
            Ok(ticket @ PushTicket::Ok { .. }) => {
                debug!(user_id = %recipient, "Push accepted by relay");
                PushStatus::Sent(ticket)
            }
            Ok(ticket) => {
                warn!(
                    user_id = %recipient,
                    error_code = ticket.error_code().unwrap_or("unknown"),
                    "Push rejected by relay"
                );
                let pruned = ticket.is_device_not_registered()
                    && self.config.prune_unregistered_tokens
                    && self.prune(recipient, &outcome.to).await;
                PushStatus::Rejected { ticket, pruned }
            }
            Err(e) => {
                warn!(user_id = %recipient, step = "push", error = %e, "Push delivery failed");
                PushStatus::Failed {
                    error: e.to_string(),
                    retryable: e.is_retryable(),
                }
            }
        }
    }

    async fn prune(&self, recipient: &UserId, token: &str) -> bool {
        match self.push_tokens.delete_if_token(recipient, token).await {
            Ok(removed) => {
                if removed {
                    info!(user_id = %recipient, "Pruned unregistered push token");
                }
                removed
            }
            Err(e) => {
                warn!(user_id = %recipient, error = %e, "Failed to prune unregistered push token");
                false
            }
        }
    }
}
