//! Payment collaborator: the hold/capture/cancel escrow primitives.
//!
//! The booking service only depends on the [`PaymentGateway`] trait; the
//! production implementation is [`stripe::StripeGateway`] (manual-capture
//! PaymentIntents) and tests use [`mock::MockGateway`].

pub mod gateway;
pub mod mock;
pub mod stripe;

pub use gateway::{HoldRequest, PaymentError, PaymentGateway};
