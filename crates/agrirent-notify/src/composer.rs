//! Notification text and payload per lifecycle event.

use agrirent_core::types::UserId;
use agrirent_entity::booking::{Booking, BookingStatus};
use agrirent_entity::equipment::Equipment;
use agrirent_entity::notification::NotificationPayload;
use agrirent_entity::user::UserProfile;

/// A notification ready for delivery to one recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedNotification {
    pub recipient_id: UserId,
    pub title: String,
    pub body: String,
    pub payload: NotificationPayload,
}

/// Statuses whose arrival notifies the renter.
pub fn notifies_on(status: BookingStatus) -> bool {
    matches!(status, BookingStatus::Accepted | BookingStatus::Cancelled)
}

fn equipment_name(equipment: Option<&Equipment>) -> Option<&str> {
    equipment.and_then(|e| e.name.as_deref())
}

/// The owner's notice that a renter asked to book their equipment.
pub fn compose_created(
    booking: &Booking,
    equipment: Option<&Equipment>,
    requester: Option<&UserProfile>,
) -> ComposedNotification {
    let name = equipment_name(equipment);
    let requester_name = requester
        .and_then(|u| u.display_name.as_deref())
        .unwrap_or("Someone");

    ComposedNotification {
        recipient_id: booking.owner_id.clone(),
        title: "New Booking Request".to_string(),
        body: format!(
            "{requester_name} has requested to book your {}",
            name.unwrap_or("equipment")
        ),
        payload: NotificationPayload::BookingRequest {
            booking_id: booking.id.clone(),
            equipment_id: booking.equipment_id.clone(),
            equipment_name: name.map(str::to_string),
            renter_id: booking.renter_id.clone(),
        },
    }
}

/// The renter's notice that their booking moved to `booking.status`.
///
/// `None` when the new status does not notify anyone.
pub fn compose_status_change(
    booking: &Booking,
    equipment: Option<&Equipment>,
) -> Option<ComposedNotification> {
    let name = equipment_name(equipment).unwrap_or("your equipment");
    let (verb, payload) = match booking.status {
        BookingStatus::Accepted => (
            "confirmed",
            NotificationPayload::BookingConfirmed {
                booking_id: booking.id.clone(),
                equipment_id: booking.equipment_id.clone(),
            },
        ),
        BookingStatus::Cancelled => (
            "cancelled",
            NotificationPayload::BookingCancelled {
                booking_id: booking.id.clone(),
                equipment_id: booking.equipment_id.clone(),
            },
        ),
        BookingStatus::Pending | BookingStatus::Rejected | BookingStatus::Completed => {
            return None;
        }
    };

    Some(ComposedNotification {
        recipient_id: booking.renter_id.clone(),
        title: "Booking Status Update".to_string(),
        body: format!("Your booking for {name} has been {verb}."),
        payload,
    })
}
