//! Stripe implementation of the payment gateway.
//!
//! Escrow maps onto manual-capture PaymentIntents:
//! - hold    = `POST /v1/payment_intents` with `capture_method=manual`
//! - capture = `POST /v1/payment_intents/{id}/capture`
//! - cancel  = `POST /v1/payment_intents/{id}/cancel`

use async_trait::async_trait;
use serde::Deserialize;

use crate::gateway::{HoldRequest, PaymentError, PaymentGateway};

const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

/// Stripe-backed [`PaymentGateway`].
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    base_url: String,
}

/// The subset of the PaymentIntent object we read back.
#[derive(Debug, Deserialize)]
struct PaymentIntent {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: secret_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (used against stripe-mock in staging).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Form-encoded body for the PaymentIntent creation call.
    fn hold_form(request: &HoldRequest) -> Vec<(String, String)> {
        let mut form = vec![
            ("amount".to_string(), request.amount.to_string()),
            ("currency".to_string(), request.currency.clone()),
            ("capture_method".to_string(), "manual".to_string()),
        ];
        for (key, value) in &request.metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }
        form
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await
    }
}

/// Extract a human-readable message from a Stripe error response.
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<StripeErrorBody>().await {
        Ok(body) => body
            .error
            .message
            .unwrap_or_else(|| format!("HTTP {status}")),
        Err(_) => format!("HTTP {status}"),
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_hold(&self, request: &HoldRequest) -> Result<String, PaymentError> {
        let form = Self::hold_form(request);
        let response = self
            .post_form("/v1/payment_intents", &form)
            .await
            .map_err(|e| PaymentError::HoldFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PaymentError::HoldFailed(error_message(response).await));
        }

        let intent: PaymentIntent = response
            .json()
            .await
            .map_err(|e| PaymentError::HoldFailed(e.to_string()))?;
        tracing::debug!(payment_ref = %intent.id, "Created payment hold");
        Ok(intent.id)
    }

    async fn capture_hold(&self, payment_ref: &str) -> Result<(), PaymentError> {
        let response = self
            .post_form(&format!("/v1/payment_intents/{payment_ref}/capture"), &[])
            .await
            .map_err(|e| PaymentError::CaptureFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PaymentError::CaptureFailed(error_message(response).await));
        }
        tracing::debug!(%payment_ref, "Captured payment hold");
        Ok(())
    }

    async fn cancel_hold(&self, payment_ref: &str) -> Result<(), PaymentError> {
        let response = self
            .post_form(&format!("/v1/payment_intents/{payment_ref}/cancel"), &[])
            .await
            .map_err(|e| PaymentError::CancelFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PaymentError::CancelFailed(error_message(response).await));
        }
        tracing::debug!(%payment_ref, "Cancelled payment hold");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn hold_form_requests_manual_capture() {
        let request = HoldRequest {
            amount: 10_500,
            currency: "usd".to_string(),
            metadata: HashMap::new(),
        };
        let form = StripeGateway::hold_form(&request);
        assert!(form.contains(&("amount".to_string(), "10500".to_string())));
        assert!(form.contains(&("currency".to_string(), "usd".to_string())));
        assert!(form.contains(&("capture_method".to_string(), "manual".to_string())));
    }

    #[test]
    fn hold_form_flattens_metadata() {
        let mut metadata = HashMap::new();
        metadata.insert("rental_item_id".to_string(), "abc".to_string());
        let request = HoldRequest {
            amount: 100,
            currency: "usd".to_string(),
            metadata,
        };
        let form = StripeGateway::hold_form(&request);
        assert!(form.contains(&("metadata[rental_item_id]".to_string(), "abc".to_string())));
    }
}
