//! HTTP-level integration tests for the booking lifecycle.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener; payments go through the mock gateway.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, create_item, get, post_json};
use sqlx::PgPool;
use uuid::Uuid;

use lendly_payments::mock::MockGateway;

fn booking_body(renter_id: Uuid, start: &str, end: &str) -> serde_json::Value {
    serde_json::json!({
        "renter_id": renter_id,
        "start_date": start,
        "end_date": end,
    })
}

// ---------------------------------------------------------------------------
// Create: quote, reserve, hold
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_booking_quotes_daily_rate_and_holds_deposit(pool: PgPool) {
    let owner = Uuid::new_v4();
    let renter = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let gateway = Arc::new(MockGateway::default());
    let app = common::build_test_app(pool, Arc::clone(&gateway));
    let response = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        booking_body(renter, "2025-03-10", "2025-03-12"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;

    // Two days at $50/day.
    assert_eq!(json["total_amount"], 10_000);
    assert_eq!(json["security_deposit"], 500);
    assert_eq!(json["booking_status"], "confirmed");
    assert_eq!(json["escrow_status"], "held");
    assert!(json["payment_ref"].as_str().unwrap().starts_with("pi_mock_"));

    // Exactly one hold was placed and nothing captured or cancelled.
    assert_eq!(gateway.holds().len(), 1);
    assert!(gateway.captured().is_empty());
    assert!(gateway.cancelled().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn overlapping_booking_returns_conflicting_dates(pool: PgPool) {
    let owner = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let app = common::build_app(pool.clone());
    let first = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        booking_body(Uuid::new_v4(), "2025-03-10", "2025-03-12"),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = common::build_app(pool);
    let second = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        booking_body(Uuid::new_v4(), "2025-03-11", "2025-03-13"),
    )
    .await;

    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["code"], "RANGE_UNAVAILABLE");
    assert_eq!(json["unavailable_dates"], serde_json::json!(["2025-03-11"]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn disjoint_time_slots_share_a_date(pool: PgPool) {
    let owner = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let app = common::build_app(pool.clone());
    let morning = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        serde_json::json!({
            "renter_id": Uuid::new_v4(),
            "start_date": "2025-03-10",
            "end_date": "2025-03-11",
            "start_time": "08:00:00",
            "end_time": "12:00:00",
        }),
    )
    .await;
    assert_eq!(morning.status(), StatusCode::CREATED);

    let app = common::build_app(pool);
    let evening = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        serde_json::json!({
            "renter_id": Uuid::new_v4(),
            "start_date": "2025-03-10",
            "end_date": "2025-03-11",
            "start_time": "18:00:00",
            "end_time": "21:00:00",
        }),
    )
    .await;
    assert_eq!(evening.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_cannot_book_own_item(pool: PgPool) {
    let owner = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let app = common::build_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        booking_body(owner, "2025-03-10", "2025-03-12"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn item_without_applicable_rate_is_rejected(pool: PgPool) {
    let owner = Uuid::new_v4();
    // Hourly rate only; a multi-day rental has no applicable rate.
    let app = common::build_app(pool.clone());
    let created = post_json(
        app,
        "/api/v1/rentals",
        serde_json::json!({
            "owner_id": owner,
            "title": "Pressure washer",
            "category": "tools",
            "hourly_rate": 500,
        }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let item = body_json(created).await;
    let item_id = item["id"].as_str().unwrap();

    let app = common::build_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        booking_body(Uuid::new_v4(), "2025-03-10", "2025-03-12"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NO_APPLICABLE_RATE");
}

// ---------------------------------------------------------------------------
// Create: hold failure and timeout compensation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_hold_releases_the_range(pool: PgPool) {
    let owner = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let gateway = Arc::new(MockGateway::default());
    gateway.fail_next_hold();

    let app = common::build_test_app(pool.clone(), Arc::clone(&gateway));
    let response = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        booking_body(Uuid::new_v4(), "2025-03-10", "2025-03-12"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "HOLD_FAILED");

    // The pending row was removed, so the same range books cleanly.
    let app = common::build_test_app(pool, gateway);
    let retry = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        booking_body(Uuid::new_v4(), "2025-03-10", "2025-03-12"),
    )
    .await;
    assert_eq!(retry.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn hold_timeout_releases_the_range(pool: PgPool) {
    let owner = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let gateway = Arc::new(MockGateway::default());
    // Test config uses a 1s hold timeout.
    gateway.set_hold_delay(Duration::from_secs(3));

    let app = common::build_test_app(pool.clone(), gateway);
    let response = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        booking_body(Uuid::new_v4(), "2025-03-10", "2025-03-12"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "HOLD_FAILED");

    let app = common::build_app(pool);
    let retry = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        booking_body(Uuid::new_v4(), "2025-03-10", "2025-03-12"),
    )
    .await;
    assert_eq!(retry.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Complete
// ---------------------------------------------------------------------------

async fn book(
    pool: PgPool,
    gateway: Arc<MockGateway>,
    item_id: &str,
    renter: Uuid,
) -> serde_json::Value {
    let app = common::build_test_app(pool, gateway);
    let response = post_json(
        app,
        &format!("/api/v1/rentals/{item_id}/bookings"),
        booking_body(renter, "2025-03-10", "2025-03-12"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_completes_booking_and_funds_release(pool: PgPool) {
    let owner = Uuid::new_v4();
    let renter = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let gateway = Arc::new(MockGateway::default());
    let booking = book(pool.clone(), Arc::clone(&gateway), item_id, renter).await;
    let booking_id = booking["id"].as_str().unwrap();

    let app = common::build_test_app(pool, Arc::clone(&gateway));
    let response = post_json(
        app,
        &format!("/api/v1/bookings/{booking_id}/complete"),
        serde_json::json!({ "acting_user_id": owner }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["booking_status"], "completed");
    assert_eq!(json["escrow_status"], "released");
    assert_eq!(gateway.captured().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn renter_cannot_complete_booking(pool: PgPool) {
    let owner = Uuid::new_v4();
    let renter = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let gateway = Arc::new(MockGateway::default());
    let booking = book(pool.clone(), Arc::clone(&gateway), item_id, renter).await;
    let booking_id = booking["id"].as_str().unwrap();

    let app = common::build_test_app(pool, Arc::clone(&gateway));
    let response = post_json(
        app,
        &format!("/api/v1/bookings/{booking_id}/complete"),
        serde_json::json!({ "acting_user_id": renter }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(gateway.captured().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancel_after_complete_is_an_invalid_state(pool: PgPool) {
    let owner = Uuid::new_v4();
    let renter = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let gateway = Arc::new(MockGateway::default());
    let booking = book(pool.clone(), Arc::clone(&gateway), item_id, renter).await;
    let booking_id = booking["id"].as_str().unwrap();

    let app = common::build_test_app(pool.clone(), Arc::clone(&gateway));
    let complete = post_json(
        app,
        &format!("/api/v1/bookings/{booking_id}/complete"),
        serde_json::json!({ "acting_user_id": owner }),
    )
    .await;
    assert_eq!(complete.status(), StatusCode::OK);

    let app = common::build_test_app(pool, Arc::clone(&gateway));
    let cancel = post_json(
        app,
        &format!("/api/v1/bookings/{booking_id}/cancel"),
        serde_json::json!({ "acting_user_id": renter }),
    )
    .await;

    assert_eq!(cancel.status(), StatusCode::CONFLICT);
    let json = body_json(cancel).await;
    assert_eq!(json["code"], "INVALID_STATE");
    // Funds stay released; no refund happened.
    assert!(gateway.cancelled().is_empty());
}

// ---------------------------------------------------------------------------
// Cancel
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn renter_cancel_records_fee_and_party(pool: PgPool) {
    let owner = Uuid::new_v4();
    let renter = Uuid::new_v4();
    // Fixture item is non-refundable with a $10 fee.
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let gateway = Arc::new(MockGateway::default());
    let booking = book(pool.clone(), Arc::clone(&gateway), item_id, renter).await;
    let booking_id = booking["id"].as_str().unwrap();

    let app = common::build_test_app(pool, Arc::clone(&gateway));
    let response = post_json(
        app,
        &format!("/api/v1/bookings/{booking_id}/cancel"),
        serde_json::json!({
            "acting_user_id": renter,
            "reason": "plans changed",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["booking_status"], "cancelled");
    assert_eq!(json["escrow_status"], "refunded");
    assert_eq!(json["cancelled_by"], "renter");
    assert_eq!(json["fee_retained"], 1000);
    assert_eq!(json["cancellation_reason"], "plans changed");
    assert_eq!(gateway.cancelled().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_may_cancel_but_strangers_may_not(pool: PgPool) {
    let owner = Uuid::new_v4();
    let renter = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let gateway = Arc::new(MockGateway::default());
    let booking = book(pool.clone(), Arc::clone(&gateway), item_id, renter).await;
    let booking_id = booking["id"].as_str().unwrap();

    let app = common::build_test_app(pool.clone(), Arc::clone(&gateway));
    let stranger = post_json(
        app,
        &format!("/api/v1/bookings/{booking_id}/cancel"),
        serde_json::json!({ "acting_user_id": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(stranger.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool, Arc::clone(&gateway));
    let response = post_json(
        app,
        &format!("/api/v1/bookings/{booking_id}/cancel"),
        serde_json::json!({ "acting_user_id": owner }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["cancelled_by"], "owner");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelled_range_is_bookable_again(pool: PgPool) {
    let owner = Uuid::new_v4();
    let renter = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let gateway = Arc::new(MockGateway::default());
    let booking = book(pool.clone(), Arc::clone(&gateway), item_id, renter).await;
    let booking_id = booking["id"].as_str().unwrap();

    let app = common::build_test_app(pool.clone(), Arc::clone(&gateway));
    let cancel = post_json(
        app,
        &format!("/api/v1/bookings/{booking_id}/cancel"),
        serde_json::json!({ "acting_user_id": renter }),
    )
    .await;
    assert_eq!(cancel.status(), StatusCode::OK);

    let rebooked = book(pool, gateway, item_id, Uuid::new_v4()).await;
    assert_eq!(rebooked["escrow_status"], "held");
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn booking_lists_include_item_title(pool: PgPool) {
    let owner = Uuid::new_v4();
    let renter = Uuid::new_v4();
    let item = create_item(pool.clone(), owner).await;
    let item_id = item["id"].as_str().unwrap();

    let gateway = Arc::new(MockGateway::default());
    book(pool.clone(), Arc::clone(&gateway), item_id, renter).await;

    let app = common::build_test_app(pool.clone(), Arc::clone(&gateway));
    let response = get(app, &format!("/api/v1/bookings/renter/{renter}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json[0]["item_title"], "Cordless drill");

    let app = common::build_test_app(pool, gateway);
    let response = get(app, &format!("/api/v1/bookings/owner/{owner}")).await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_booking_returns_404(pool: PgPool) {
    let app = common::build_app(pool);
    let response = get(app, &format!("/api/v1/bookings/{}", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
