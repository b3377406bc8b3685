//! Best-effort booking notifications.
//!
//! [`Notifier`] subscribes to the event bus and hands booking lifecycle
//! events to the notification transport (email/SMS live outside this
//! core and consume the structured log stream / event table). Failures
//! here are logged and suppressed: notifications are not part of the
//! booking consistency contract and never roll back a transition.

use tokio::sync::broadcast;

use crate::bus::BookingEvent;

/// Background service that dispatches booking notifications.
pub struct Notifier;

impl Notifier {
    /// Run the notification loop until the bus closes.
    pub async fn run(mut receiver: broadcast::Receiver<BookingEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => Self::dispatch(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notifier lagged, some notifications were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notifier shutting down");
                    break;
                }
            }
        }
    }

    fn dispatch(event: &BookingEvent) {
        match event.event_type.as_str() {
            "booking.created" | "booking.completed" | "booking.cancelled" => {
                tracing::info!(
                    event_type = %event.event_type,
                    booking_id = ?event.booking_id,
                    actor_user_id = ?event.actor_user_id,
                    "Dispatching booking notification"
                );
            }
            other => {
                tracing::debug!(event_type = %other, "Ignoring non-booking event");
            }
        }
    }
}
