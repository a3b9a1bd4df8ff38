//! Typed notification payloads.
//!
//! Each notification kind carries its own strongly typed fields. The flat
//! string map stored on the notification document and sent to the push
//! relay is produced only by [`NotificationPayload::to_data`].

use std::collections::BTreeMap;

use agrirent_core::types::{BookingId, EquipmentId, UserId};

use crate::booking::BookingStatus;

/// Machine-readable notification type stored under `data.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    BookingRequest,
    BookingConfirmed,
    BookingCancelled,
    Custom,
}

impl NotificationType {
    /// Return the type as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookingRequest => "booking_request",
            Self::BookingConfirmed => "booking_confirmed",
            Self::BookingCancelled => "booking_cancelled",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured data attached to a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationPayload {
    /// A renter asked to book the recipient's equipment.
    BookingRequest {
        booking_id: BookingId,
        equipment_id: EquipmentId,
        equipment_name: Option<String>,
        renter_id: UserId,
    },
    /// The owner accepted the recipient's booking.
    BookingConfirmed {
        booking_id: BookingId,
        equipment_id: EquipmentId,
    },
    /// The recipient's booking was cancelled.
    BookingCancelled {
        booking_id: BookingId,
        equipment_id: EquipmentId,
    },
    /// Ad-hoc data supplied by a caller.
    Custom(BTreeMap<String, String>),
}

impl NotificationPayload {
    /// The notification type of this payload.
    pub fn notification_type(&self) -> NotificationType {
        match self {
            Self::BookingRequest { .. } => NotificationType::BookingRequest,
            Self::BookingConfirmed { .. } => NotificationType::BookingConfirmed,
            Self::BookingCancelled { .. } => NotificationType::BookingCancelled,
            Self::Custom(_) => NotificationType::Custom,
        }
    }

    /// Booking this payload refers to, if any.
    pub fn booking_id(&self) -> Option<&BookingId> {
        match self {
            Self::BookingRequest { booking_id, .. }
            | Self::BookingConfirmed { booking_id, .. }
            | Self::BookingCancelled { booking_id, .. } => Some(booking_id),
            Self::Custom(_) => None,
        }
    }

    /// Flatten into the string map used on the wire.
    pub fn to_data(&self) -> BTreeMap<String, String> {
        let mut data = BTreeMap::new();
        match self {
            Self::BookingRequest {
                booking_id,
                equipment_id,
                equipment_name,
                renter_id,
            } => {
                data.insert("bookingId".into(), booking_id.to_string());
                data.insert("equipmentId".into(), equipment_id.to_string());
                if let Some(name) = equipment_name {
                    data.insert("equipmentName".into(), name.clone());
                }
                data.insert("renterId".into(), renter_id.to_string());
            }
            Self::BookingConfirmed {
                booking_id,
                equipment_id,
            } => {
                data.insert("bookingId".into(), booking_id.to_string());
                data.insert("equipmentId".into(), equipment_id.to_string());
                data.insert("status".into(), BookingStatus::Accepted.to_string());
            }
            Self::BookingCancelled {
                booking_id,
                equipment_id,
            } => {
                data.insert("bookingId".into(), booking_id.to_string());
                data.insert("equipmentId".into(), equipment_id.to_string());
                data.insert("status".into(), BookingStatus::Cancelled.to_string());
            }
            Self::Custom(custom) => {
                data.extend(custom.iter().map(|(k, v)| (k.clone(), v.clone())));
                data.entry("type".into())
                    .or_insert_with(|| NotificationType::Custom.as_str().to_string());
                return data;
            }
        }
        data.insert("type".into(), self.notification_type().as_str().into());
        data
    }
}
