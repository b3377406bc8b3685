//! Business logic services that coordinate repositories, the payment
//! gateway, and the event bus.

pub mod booking;

pub use booking::BookingService;
