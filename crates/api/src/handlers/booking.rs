//! Booking lifecycle handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use lendly_core::error::CoreError;
use lendly_core::types::EntityId;
use lendly_db::models::rental_booking::{
    BookingListRow, CancelBookingRequest, CompleteBookingRequest, RentalBooking,
};
use lendly_db::repositories::rental_booking_repo::RentalBookingRepo;

use crate::error::AppResult;
use crate::services::booking::CreateBookingRequest;
use crate::services::BookingService;
use crate::state::AppState;

/// `POST /api/v1/rentals/{id}/bookings`
pub async fn create_booking(
    State(state): State<AppState>,
    Path(rental_item_id): Path<EntityId>,
    Json(request): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<RentalBooking>)> {
    let booking = BookingService::create_booking(&state, rental_item_id, &request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// `GET /api/v1/bookings/{id}`
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<RentalBooking>> {
    let booking = RentalBookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "booking",
            id,
        })?;
    Ok(Json(booking))
}

/// `POST /api/v1/bookings/{id}/complete`
pub async fn complete_booking(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(request): Json<CompleteBookingRequest>,
) -> AppResult<Json<RentalBooking>> {
    let booking = BookingService::complete_booking(&state, id, request.acting_user_id).await?;
    Ok(Json(booking))
}

/// `POST /api/v1/bookings/{id}/cancel`
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(request): Json<CancelBookingRequest>,
) -> AppResult<Json<RentalBooking>> {
    let booking =
        BookingService::cancel_booking(&state, id, request.acting_user_id, request.reason.as_deref())
            .await?;
    Ok(Json(booking))
}

/// `GET /api/v1/bookings/renter/{user_id}`
pub async fn list_renter_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<EntityId>,
) -> AppResult<Json<Vec<BookingListRow>>> {
    let bookings = RentalBookingRepo::list_by_renter(&state.pool, user_id).await?;
    Ok(Json(bookings))
}

/// `GET /api/v1/bookings/owner/{user_id}`
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<EntityId>,
) -> AppResult<Json<Vec<BookingListRow>>> {
    let bookings = RentalBookingRepo::list_by_owner(&state.pool, user_id).await?;
    Ok(Json(bookings))
}
