use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{availability, booking, rental_item};
use crate::state::AppState;

/// Rental item routes, including availability and booking creation.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(rental_item::create_rental_item))
        .route(
            "/{id}",
            get(rental_item::get_rental_item)
                .put(rental_item::update_rental_item)
                .patch(rental_item::update_rental_item)
                .delete(rental_item::deactivate_rental_item),
        )
        .route("/owner/{owner_id}", get(rental_item::list_owner_items))
        .route(
            "/{id}/availability",
            get(availability::get_availability).put(availability::set_availability),
        )
        .route("/{id}/bookings", post(booking::create_booking))
}
