//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod availability_slot_repo;
pub mod rental_booking_repo;
pub mod rental_item_repo;

pub use availability_slot_repo::AvailabilitySlotRepo;
pub use rental_booking_repo::RentalBookingRepo;
pub use rental_item_repo::RentalItemRepo;
