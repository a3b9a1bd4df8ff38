//! Request DTOs with validation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// `registerPushToken` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterPushTokenRequest {
    #[serde(default)]
    pub token: Option<String>,
}

/// `sendCustomNotification` body. Missing fields are reported by the
/// service as `invalid-argument`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    #[serde(default)]
    pub target_user_id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200, message = "Title is too long"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(max = 4000, message = "Body is too long"))]
    pub body: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

/// Booking request body; the caller is the renter.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    #[validate(length(min = 1, message = "equipmentId is required"))]
    pub equipment_id: String,
    #[serde(default)]
    pub listing_id: Option<String>,
    #[validate(length(min = 1, message = "ownerId is required"))]
    pub owner_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(range(exclusive_min = 0.0, message = "totalPrice must be positive"))]
    pub total_price: f64,
}

/// Status update body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusBody {
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// Query parameters for the inbox listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListNotificationsQuery {
    /// Page size (default 50, max 200).
    #[serde(default)]
    pub limit: Option<usize>,
}
