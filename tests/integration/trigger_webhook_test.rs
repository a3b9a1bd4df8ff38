//! Integration tests for the booking trigger webhook.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use agrirent_core::types::collections;
use helpers::TestApp;

fn booking(status: &str) -> Value {
    json!({
        "equipmentId": "E1",
        "renterId": "R1",
        "ownerId": "O1",
        "startDate": "2025-06-01T00:00:00Z",
        "endDate": "2025-06-03T00:00:00Z",
        "totalPrice": 200.0,
        "status": status,
    })
}

#[tokio::test]
async fn test_webhook_requires_configured_secret() {
    let mut config = TestApp::default_config();
    config.trigger.webhook_secret = Some("s3cret".into());
    let app = TestApp::with_config(config);
    app.seed(collections::BOOKINGS, "b1", booking("pending")).await;

    let body = json!({ "bookingId": "b1", "before": null, "after": booking("pending") });

    let response = app
        .request("POST", "/internal/triggers/bookings", Some(body.clone()), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request_with_headers(
            "POST",
            "/internal/triggers/bookings",
            Some(body.clone()),
            None,
            &[("x-trigger-secret", "wrong")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request_with_headers(
            "POST",
            "/internal/triggers/bookings",
            Some(body),
            None,
            &[("x-trigger-secret", "s3cret")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["outcome"], "delivered");
}

#[tokio::test]
async fn test_writes_without_notifications_are_ignored() {
    let app = TestApp::new();

    let deleted = app
        .fire_trigger("b1", booking("pending"), Value::Null)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["outcome"], "ignored");

    let unchanged = app
        .fire_trigger("b1", booking("accepted"), booking("accepted"))
        .await;
    assert_eq!(unchanged.body["outcome"], "ignored");

    let mut missing_price = booking("pending");
    missing_price.as_object_mut().unwrap().remove("totalPrice");
    let invalid = app.fire_trigger("b1", Value::Null, missing_price).await;
    assert_eq!(invalid.status, StatusCode::OK);
    assert_eq!(invalid.body["outcome"], "ignored");

    assert!(app.relay.sent().is_empty());
}

#[tokio::test]
async fn test_missing_equipment_uses_fallback_text() {
    let app = TestApp::new();
    app.seed(collections::BOOKINGS, "b1", booking("pending")).await;

    let response = app
        .fire_trigger("b1", Value::Null, booking("pending"))
        .await;
    assert_eq!(response.body["outcome"], "delivered");
    // No device registered for the owner.
    assert_eq!(response.body["push"]["status"], "skipped");

    let inbox = app
        .request("GET", "/api/notifications", None, Some(&app.token_for("O1")))
        .await;
    let first = &inbox.body[0];
    assert_eq!(first["message"], "Someone has requested to book your equipment");
    assert_eq!(first["data"]["bookingId"], "b1");
}

#[tokio::test]
async fn test_cancellation_notifies_renter_once() {
    let app = TestApp::new();
    app.seed_marketplace().await;
    app.seed(collections::BOOKINGS, "b1", booking("cancelled")).await;

    let first = app
        .fire_trigger("b1", booking("accepted"), booking("cancelled"))
        .await;
    assert_eq!(first.body["outcome"], "delivered");

    let flagged = app.booking_document("b1").await;
    assert_eq!(flagged["hasNotifiedStatusChange"], true);

    let replay = app
        .fire_trigger("b1", booking("accepted"), flagged)
        .await;
    assert_eq!(replay.body["outcome"], "suppressed");

    let sent = app.relay.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "Your booking for Tractor has been cancelled.");
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/internal/triggers/bookings",
            Some(json!({ "before": null })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
