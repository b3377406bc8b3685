use std::sync::Arc;

use lendly_events::EventBus;
use lendly_payments::PaymentGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lendly_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Payment collaborator (Stripe in production, mock in tests).
    pub payments: Arc<dyn PaymentGateway>,
    /// Centralized event bus for publishing booking events.
    pub event_bus: Arc<EventBus>,
}
