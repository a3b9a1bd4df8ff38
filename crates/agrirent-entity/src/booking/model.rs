//! Booking snapshot and validated booking models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agrirent_core::types::{BookingId, Document, EquipmentId, ListingId, UserId};

use super::status::BookingStatus;
use super::validation::ValidationError;

/// Raw booking document as read from the store.
///
/// Every field is optional so that a malformed or partial write can still be
/// classified; [`super::validate`] turns a snapshot into a [`Booking`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "crate::timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "crate::timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub booking_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub has_notified_creation: bool,
    #[serde(default)]
    pub has_notified_status_change: bool,
}

impl BookingSnapshot {
    /// Decode a snapshot from a raw document. Unknown fields are ignored.
    pub fn from_document(document: &Document) -> Result<Self, ValidationError> {
        serde_json::from_value(serde_json::Value::Object(document.clone()))
            .map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Encode the snapshot as a document.
    pub fn to_document(&self) -> Document {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => Document::new(),
        }
    }
}

/// Idempotency markers stored on the booking record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationFlag {
    /// Set once the creation notification was handled.
    Creation,
    /// Set once a status-change notification was handled.
    StatusChange,
}

impl NotificationFlag {
    /// Field name on the booking document.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Creation => "hasNotifiedCreation",
            Self::StatusChange => "hasNotifiedStatusChange",
        }
    }

    /// Whether the flag is already set on `snapshot`.
    pub fn is_set(&self, snapshot: &BookingSnapshot) -> bool {
        match self {
            Self::Creation => snapshot.has_notified_creation,
            Self::StatusChange => snapshot.has_notified_status_change,
        }
    }
}

/// A booking that satisfies every record invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub equipment_id: EquipmentId,
    pub listing_id: Option<ListingId>,
    pub renter_id: UserId,
    pub owner_id: UserId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: f64,
    pub booking_date: Option<DateTime<Utc>>,
    pub status: BookingStatus,
    pub has_notified_creation: bool,
    pub has_notified_status_change: bool,
}

impl Booking {
    /// Convert back into the stored representation.
    pub fn to_snapshot(&self) -> BookingSnapshot {
        BookingSnapshot {
            equipment_id: Some(self.equipment_id.to_string()),
            listing_id: self.listing_id.as_ref().map(ToString::to_string),
            renter_id: Some(self.renter_id.to_string()),
            owner_id: Some(self.owner_id.to_string()),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            total_price: Some(self.total_price),
            booking_date: self.booking_date,
            status: Some(self.status.as_str().to_string()),
            has_notified_creation: self.has_notified_creation,
            has_notified_status_change: self.has_notified_status_change,
        }
    }

    /// Whether `user` is the renter or the owner of this booking.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.renter_id == user || &self.owner_id == user
    }
}
