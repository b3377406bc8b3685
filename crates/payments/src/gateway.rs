//! The payment gateway capability consumed by the booking service.

use std::collections::HashMap;

use async_trait::async_trait;

/// Failures from the external payment provider.
///
/// A `HoldFailed` during booking creation triggers the compensating
/// ledger release; `CaptureFailed`/`CancelFailed` leave the booking held
/// for operator retry.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Hold failed: {0}")]
    HoldFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Cancel failed: {0}")]
    CancelFailed(String),
}

/// A request to reserve funds without capturing them.
#[derive(Debug, Clone)]
pub struct HoldRequest {
    /// Amount in cents: rental total plus security deposit.
    pub amount: i64,
    /// ISO currency code, e.g. `"usd"`.
    pub currency: String,
    /// Free-form key/value metadata attached to the provider object.
    pub metadata: HashMap<String, String>,
}

/// The three escrow primitives: reserve funds, finalize the transfer,
/// release the reservation.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Reserve funds, returning an opaque payment reference.
    async fn create_hold(&self, request: &HoldRequest) -> Result<String, PaymentError>;

    /// Finalize the transfer of previously held funds to the payee.
    async fn capture_hold(&self, payment_ref: &str) -> Result<(), PaymentError>;

    /// Release a hold back to the payer.
    async fn cancel_hold(&self, payment_ref: &str) -> Result<(), PaymentError>;
}
