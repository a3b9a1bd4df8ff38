//! Booking creation and status updates.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use agrirent_core::error::AppError;
use agrirent_core::types::{BookingId, EquipmentId, ListingId, UserId};
use agrirent_entity::booking::BookingStatus;
use agrirent_entity::booking::status::UnknownStatus;
use agrirent_notify::CreateBookingRequest;

use crate::dto::request::{CreateBookingBody, UpdateStatusBody};
use crate::dto::response::BookingView;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/bookings
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateBookingBody>,
) -> Result<(StatusCode, Json<BookingView>), ApiError> {
    let request = CreateBookingRequest {
        equipment_id: EquipmentId::new(body.equipment_id),
        listing_id: body
            .listing_id
            .filter(|l| !l.trim().is_empty())
            .map(ListingId::new),
        owner_id: UserId::new(body.owner_id),
        start_date: body.start_date,
        end_date: body.end_date,
        total_price: body.total_price,
    };
    let booking = state.bookings.create_booking(&auth, request).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// POST /api/bookings/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateStatusBody>,
) -> Result<Json<BookingView>, ApiError> {
    let status: BookingStatus = body
        .status
        .parse()
        .map_err(|e: UnknownStatus| AppError::validation(e.to_string()))?;
    let booking = state
        .bookings
        .update_status(&auth, &BookingId::new(id), status)
        .await?;
    Ok(Json(booking.into()))
}
