//! Response DTOs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agrirent_entity::booking::Booking;
use agrirent_entity::notification::Notification;
use agrirent_notify::{DeliveryResult, PushStatus, TriggerOutcome};
use agrirent_push::PushTicket;

/// Bare acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Push side of a delivery, flattened for clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSummary {
    /// `sent`, `rejected`, `skipped` or `failed`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&PushStatus> for PushSummary {
    fn from(status: &PushStatus) -> Self {
        let (status, reason) = match status {
            PushStatus::Sent(_) => ("sent", None),
            PushStatus::Rejected { ticket, pruned } => (
                "rejected",
                Some(match (ticket.error_code(), *pruned) {
                    (Some(code), true) => format!("{code} (token removed)"),
                    (Some(code), false) => code.to_string(),
                    (None, _) => "rejected by relay".to_string(),
                }),
            ),
            PushStatus::Skipped(reason) => ("skipped", Some(reason.as_str().to_string())),
            PushStatus::Failed { error, .. } => ("failed", Some(error.clone())),
        };
        Self {
            status: status.to_string(),
            reason,
        }
    }
}

/// `sendCustomNotification` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponse {
    pub success: bool,
    pub notification_id: String,
    pub push: PushSummary,
    /// Relay tickets, when the relay answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets: Option<Vec<PushTicket>>,
}

impl From<DeliveryResult> for SendNotificationResponse {
    fn from(result: DeliveryResult) -> Self {
        let tickets = match &result.push {
            PushStatus::Sent(ticket) | PushStatus::Rejected { ticket, .. } => Some(vec![ticket.clone()]),
            PushStatus::Skipped(_) | PushStatus::Failed { .. } => None,
        };
        Self {
            success: true,
            notification_id: result.notification.id.to_string(),
            push: PushSummary::from(&result.push),
            tickets,
        }
    }
}

/// A notification as shown in the inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub data: BTreeMap<String, String>,
}

impl From<Notification> for NotificationView {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.into_string(),
            title: n.title,
            message: n.message,
            timestamp: n.timestamp,
            read: n.read,
            data: n.data,
        }
    }
}

/// A booking as returned to its parties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: String,
    pub equipment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    pub renter_id: String,
    pub owner_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<DateTime<Utc>>,
    pub status: String,
}

impl From<Booking> for BookingView {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id.into_string(),
            equipment_id: b.equipment_id.into_string(),
            listing_id: b.listing_id.map(|l| l.into_string()),
            renter_id: b.renter_id.into_string(),
            owner_id: b.owner_id.into_string(),
            start_date: b.start_date,
            end_date: b.end_date,
            total_price: b.total_price,
            booking_date: b.booking_date,
            status: b.status.as_str().to_string(),
        }
    }
}

/// Trigger webhook result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push: Option<PushSummary>,
}

impl From<&TriggerOutcome> for TriggerResponse {
    fn from(outcome: &TriggerOutcome) -> Self {
        let mut response = Self {
            outcome: outcome.label().to_string(),
            reason: None,
            notification_id: None,
            push: None,
        };
        match outcome {
            TriggerOutcome::Ignored(reason)
            | TriggerOutcome::Skipped(reason)
            | TriggerOutcome::Suppressed(reason)
            | TriggerOutcome::Failed { reason, .. } => response.reason = Some(reason.clone()),
            TriggerOutcome::Delivered(result) => {
                response.notification_id = Some(result.notification.id.to_string());
                response.push = Some(PushSummary::from(&result.push));
            }
        }
        response
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answered, `degraded` otherwise.
    pub status: String,
    pub version: String,
    pub store: bool,
    pub claims: bool,
}
