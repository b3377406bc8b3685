pub mod booking;
pub mod health;
pub mod rental;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /rentals                               create item (POST)
/// /rentals/{id}                          get, update, deactivate
/// /rentals/owner/{owner_id}              list an owner's items (GET)
/// /rentals/{id}/availability             get resolved availability, replace slots (GET, PUT)
/// /rentals/{id}/bookings                 book the item (POST)
///
/// /bookings/{id}                         get booking (GET)
/// /bookings/{id}/complete                owner completes, funds released (POST)
/// /bookings/{id}/cancel                  either party cancels, funds refunded (POST)
/// /bookings/renter/{user_id}             list a renter's bookings (GET)
/// /bookings/owner/{user_id}              list an owner's bookings (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Rental items, their availability, and booking creation.
        .nest("/rentals", rental::router())
        // Booking reads and escrow transitions.
        .nest("/bookings", booking::router())
}
