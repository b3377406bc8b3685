use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Booking reads and escrow transition routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(booking::get_booking))
        .route("/{id}/complete", post(booking::complete_booking))
        .route("/{id}/cancel", post(booking::cancel_booking))
        .route("/renter/{user_id}", get(booking::list_renter_bookings))
        .route("/owner/{user_id}", get(booking::list_owner_bookings))
}
