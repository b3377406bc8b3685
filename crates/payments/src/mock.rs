//! In-memory gateway for tests and local development.
//!
//! Records every hold/capture/cancel call, can fail the next hold, and
//! can delay hold confirmation to exercise the create-path timeout.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::gateway::{HoldRequest, PaymentError, PaymentGateway};

#[derive(Default)]
pub struct MockGateway {
    next_id: AtomicU64,
    fail_next_hold: AtomicBool,
    hold_delay: Mutex<Option<Duration>>,
    holds: Mutex<Vec<String>>,
    captured: Mutex<Vec<String>>,
    cancelled: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_hold` call fail with `HoldFailed`.
    pub fn fail_next_hold(&self) {
        self.fail_next_hold.store(true, Ordering::SeqCst);
    }

    /// Delay every `create_hold` call, to trip the caller's timeout.
    pub fn set_hold_delay(&self, delay: Duration) {
        *self.hold_delay.lock().unwrap() = Some(delay);
    }

    pub fn holds(&self) -> Vec<String> {
        self.holds.lock().unwrap().clone()
    }

    pub fn captured(&self) -> Vec<String> {
        self.captured.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_hold(&self, _request: &HoldRequest) -> Result<String, PaymentError> {
        let delay = *self.hold_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_next_hold.swap(false, Ordering::SeqCst) {
            return Err(PaymentError::HoldFailed("card declined".to_string()));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let payment_ref = format!("pi_mock_{n}");
        self.holds.lock().unwrap().push(payment_ref.clone());
        Ok(payment_ref)
    }

    async fn capture_hold(&self, payment_ref: &str) -> Result<(), PaymentError> {
        if !self.holds.lock().unwrap().contains(&payment_ref.to_string()) {
            return Err(PaymentError::CaptureFailed(format!(
                "unknown payment reference {payment_ref}"
            )));
        }
        self.captured.lock().unwrap().push(payment_ref.to_string());
        Ok(())
    }

    async fn cancel_hold(&self, payment_ref: &str) -> Result<(), PaymentError> {
        if !self.holds.lock().unwrap().contains(&payment_ref.to_string()) {
            return Err(PaymentError::CancelFailed(format!(
                "unknown payment reference {payment_ref}"
            )));
        }
        self.cancelled.lock().unwrap().push(payment_ref.to_string());
        Ok(())
    }
}
