//! Booking event fan-out.
//!
//! The booking service publishes lifecycle events on an in-process bus;
//! subscribers persist them and dispatch best-effort notifications.
//! Subscriber failures never roll back a booking transition.

pub mod bus;
pub mod notify;
pub mod persistence;

pub use bus::{BookingEvent, EventBus};
pub use notify::Notifier;
pub use persistence::EventPersistence;
