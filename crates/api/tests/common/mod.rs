//! Shared helpers for HTTP-level integration tests.
//!
//! Tests drive the real application router (same middleware stack as
//! production) via `tower::ServiceExt`, with the payment gateway swapped
//! for [`MockGateway`].

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use lendly_api::config::{PaymentConfig, ServerConfig};
use lendly_api::router::build_app_router;
use lendly_api::state::AppState;
use lendly_events::EventBus;
use lendly_payments::mock::MockGateway;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        payments: PaymentConfig {
            stripe_secret_key: "sk_test_unused".to_string(),
            currency: "usd".to_string(),
            // Short hold timeout so timeout tests complete quickly.
            hold_timeout_secs: 1,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given pool and mock payment gateway.
///
/// Mirrors `main.rs` router construction so tests exercise the exact
/// production middleware stack.
pub fn build_test_app(pool: PgPool, gateway: Arc<MockGateway>) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        payments: gateway,
        event_bus: Arc::new(EventBus::default()),
    };

    build_app_router(state, &config)
}

/// Build a test app with a fresh mock gateway when the test does not
/// need to inspect or steer payment behaviour.
pub fn build_app(pool: PgPool) -> Router {
    build_test_app(pool, Arc::new(MockGateway::default()))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a rental item via the API and return its JSON representation.
///
/// Defaults: $50/day daily rate, $5 security deposit, $10 non-refundable
/// cancellation fee.
pub async fn create_item(pool: PgPool, owner_id: uuid::Uuid) -> serde_json::Value {
    let app = build_app(pool);
    let response = post_json(
        app,
        "/api/v1/rentals",
        serde_json::json!({
            "owner_id": owner_id,
            "title": "Cordless drill",
            "category": "tools",
            "daily_rate": 5000,
            "security_deposit": 500,
            "cancellation_fee": 1000,
            "is_refundable_cancellation": false,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}
