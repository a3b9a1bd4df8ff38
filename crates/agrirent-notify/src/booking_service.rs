//! Booking writes performed on behalf of a signed-in user.
//!
//! Creation and status changes only write the booking record; the
//! notifications they cause are produced by the trigger pipeline when the
//! write is observed.

use chrono::{DateTime, Utc};
use tracing::info;

use agrirent_core::error::AppError;
use agrirent_core::result::AppResult;
use agrirent_core::types::{BookingId, EquipmentId, ListingId, UserId};
use agrirent_database::repositories::BookingRepository;
use agrirent_entity::booking::{Booking, BookingSnapshot, BookingStatus, TransitionPolicy, validate};

/// Fields a renter supplies when requesting a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBookingRequest {
    pub equipment_id: EquipmentId,
    pub listing_id: Option<ListingId>,
    pub owner_id: UserId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: f64,
}

/// Booking lifecycle service.
#[derive(Debug, Clone)]
pub struct BookingService {
    bookings: BookingRepository,
    policy: TransitionPolicy,
}

impl BookingService {
    pub fn new(bookings: BookingRepository, policy: TransitionPolicy) -> Self {
        Self { bookings, policy }
    }

    /// Create a pending booking with `renter` as the requester.
    pub async fn create_booking(&self, renter: &UserId, req: CreateBookingRequest) -> AppResult<Booking> {
        if renter == &req.owner_id {
            return Err(AppError::validation("Cannot book your own equipment"));
        }

        let snapshot = BookingSnapshot {
            equipment_id: Some(req.equipment_id.into_string()),
            listing_id: req.listing_id.map(ListingId::into_string),
            renter_id: Some(renter.to_string()),
            owner_id: Some(req.owner_id.into_string()),
            start_date: Some(req.start_date),
            end_date: Some(req.end_date),
            total_price: Some(req.total_price),
            booking_date: Some(Utc::now()),
            status: Some(BookingStatus::Pending.as_str().to_string()),
            has_notified_creation: false,
            has_notified_status_change: false,
        };
        let mut booking = validate(&BookingId::default(), &snapshot)
            .map_err(|e| AppError::validation(e.to_string()))?;

        booking.id = self.bookings.create(&snapshot).await?;
        info!(
            booking_id = %booking.id,
            renter_id = %booking.renter_id,
            owner_id = %booking.owner_id,
            "Booking created"
        );
        Ok(booking)
    }

    /// Move a booking to `status`.
    ///
    /// The owner accepts, rejects and completes; either party may cancel.
    /// Nobody moves a booking back to pending. Setting the current status
    /// again is accepted without a write.
    pub async fn update_status(&self, actor: &UserId, id: &BookingId, status: BookingStatus) -> AppResult<Booking> {
        let snapshot = self
            .bookings
            .find_snapshot(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))?;
        let mut booking =
            validate(id, &snapshot).map_err(|e| AppError::validation(format!("Booking {id} is invalid: {e}")))?;

        let permitted = match status {
            BookingStatus::Cancelled => booking.involves(actor),
            BookingStatus::Accepted | BookingStatus::Rejected | BookingStatus::Completed => {
                &booking.owner_id == actor
            }
            BookingStatus::Pending => false,
        };
        if !permitted {
            return Err(AppError::authorization(format!(
                "Not allowed to set booking {id} to {status}"
            )));
        }

        if booking.status == status {
            return Ok(booking);
        }
        self.policy
            .check(booking.status, status)
            .map_err(|e| AppError::conflict(e.to_string()))?;

        self.bookings.update_status(id, status).await?;
        info!(booking_id = %id, from = %booking.status, to = %status, actor = %actor, "Booking status updated");
        booking.status = status;
        Ok(booking)
    }
}
