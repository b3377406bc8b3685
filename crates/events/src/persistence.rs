//! Durable event persistence service.
//!
//! [`EventPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and writes every received [`BookingEvent`] to the
//! `events` table. It runs as a long-lived background task and shuts down
//! gracefully when the bus sender is dropped.

use sqlx::PgPool;
use tokio::sync::broadcast;

use crate::bus::BookingEvent;

/// Background service that persists booking events to the database.
pub struct EventPersistence;

impl EventPersistence {
    /// Run the persistence loop.
    ///
    /// Subscribes to the event bus via the provided `receiver` and persists
    /// every event it receives. The loop exits when the channel is closed
    /// (i.e. the [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(pool: PgPool, mut receiver: broadcast::Receiver<BookingEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to persist event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Event persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Write a single event to the `events` table.
    async fn persist(pool: &PgPool, event: &BookingEvent) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO events (event_type, booking_id, actor_user_id, payload, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&event.event_type)
        .bind(event.booking_id)
        .bind(event.actor_user_id)
        .bind(&event.payload)
        .bind(event.timestamp)
        .execute(pool)
        .await
        .map(|_| ())
    }
}
