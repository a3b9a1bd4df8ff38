//! Booking record validation.

use chrono::{DateTime, Utc};

use agrirent_core::types::{BookingId, EquipmentId, ListingId, UserId};

use super::model::{Booking, BookingSnapshot};
use super::status::BookingStatus;

/// Reasons a booking record is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The document could not be decoded at all.
    #[error("malformed booking document: {0}")]
    Malformed(String),

    /// A required field is absent or blank.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// The rental period is empty or reversed.
    #[error("start date {start} must be before end date {end}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The price is zero, negative, or not a number.
    #[error("total price must be positive, got {0}")]
    NonPositivePrice(f64),

    /// The status is not one of the known values.
    #[error("unknown booking status '{0}'")]
    UnknownStatus(String),
}

/// Validate a raw booking snapshot.
///
/// Pure function: checks required parties and equipment, the date range,
/// the price, and the status value.
pub fn validate(id: &BookingId, raw: &BookingSnapshot) -> Result<Booking, ValidationError> {
    let owner_id = required_id(&raw.owner_id, "ownerId")?;
    let renter_id = required_id(&raw.renter_id, "renterId")?;
    let equipment_id = required_id(&raw.equipment_id, "equipmentId")?;

    let start_date = raw.start_date.ok_or(ValidationError::MissingField("startDate"))?;
    let end_date = raw.end_date.ok_or(ValidationError::MissingField("endDate"))?;
    if start_date >= end_date {
        return Err(ValidationError::InvalidDateRange {
            start: start_date,
            end: end_date,
        });
    }

    let total_price = raw
        .total_price
        .ok_or(ValidationError::MissingField("totalPrice"))?;
    if !total_price.is_finite() || total_price <= 0.0 {
        return Err(ValidationError::NonPositivePrice(total_price));
    }

    let status_raw = raw
        .status
        .as_deref()
        .ok_or(ValidationError::MissingField("status"))?;
    let status: BookingStatus = status_raw
        .parse()
        .map_err(|_| ValidationError::UnknownStatus(status_raw.to_string()))?;

    Ok(Booking {
        id: id.clone(),
        equipment_id: EquipmentId::new(equipment_id),
        listing_id: raw
            .listing_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(ListingId::new),
        renter_id: UserId::new(renter_id),
        owner_id: UserId::new(owner_id),
        start_date,
        end_date,
        total_price,
        booking_date: raw.booking_date,
        status,
        has_notified_creation: raw.has_notified_creation,
        has_notified_status_change: raw.has_notified_status_change,
    })
}

fn required_id<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}
