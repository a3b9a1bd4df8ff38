//! Integration tests for the booking lifecycle driving notifications.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use helpers::{OWNER_TOKEN, RENTER_TOKEN, TestApp};

async fn create_booking(app: &TestApp) -> String {
    let renter = app.token_for("R1");
    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(json!({
                "equipmentId": "E1",
                "ownerId": "O1",
                "startDate": "2025-06-01T00:00:00Z",
                "endDate": "2025-06-03T00:00:00Z",
                "totalPrice": 200.0,
            })),
            Some(&renter),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["status"], "pending");
    assert_eq!(response.body["renterId"], "R1");
    response.body["id"].as_str().unwrap().to_string()
}

async fn inbox(app: &TestApp, user: &str) -> Vec<Value> {
    let token = app.token_for(user);
    let response = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.body.as_array().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_request_then_acceptance_notifies_both_parties() {
    let app = TestApp::new();
    app.seed_marketplace().await;

    let booking_id = create_booking(&app).await;
    let created = app.booking_document(&booking_id).await;

    let response = app.fire_trigger(&booking_id, Value::Null, created).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["outcome"], "delivered");
    assert_eq!(response.body["push"]["status"], "sent");

    let owner_inbox = inbox(&app, "O1").await;
    assert_eq!(owner_inbox.len(), 1);
    assert_eq!(owner_inbox[0]["title"], "New Booking Request");
    assert_eq!(owner_inbox[0]["message"], "Alice has requested to book your Tractor");
    assert_eq!(owner_inbox[0]["read"], false);

    let pending = app.booking_document(&booking_id).await;
    assert_eq!(pending["hasNotifiedCreation"], true);

    let owner = app.token_for("O1");
    let response = app
        .request(
            "POST",
            &format!("/api/bookings/{booking_id}/status"),
            Some(json!({ "status": "accepted" })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["status"], "accepted");

    let accepted = app.booking_document(&booking_id).await;
    let response = app.fire_trigger(&booking_id, pending, accepted).await;
    assert_eq!(response.body["outcome"], "delivered");

    let renter_inbox = inbox(&app, "R1").await;
    assert_eq!(renter_inbox.len(), 1);
    assert_eq!(renter_inbox[0]["title"], "Booking Status Update");
    assert_eq!(renter_inbox[0]["message"], "Your booking for Tractor has been confirmed.");

    let sent = app.relay.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, OWNER_TOKEN);
    assert_eq!(sent[1].to, RENTER_TOKEN);
}

#[tokio::test]
async fn test_redelivered_creation_is_suppressed() {
    let app = TestApp::new();
    app.seed_marketplace().await;

    let booking_id = create_booking(&app).await;
    let created = app.booking_document(&booking_id).await;

    let first = app
        .fire_trigger(&booking_id, Value::Null, created.clone())
        .await;
    assert_eq!(first.body["outcome"], "delivered");

    let second = app.fire_trigger(&booking_id, Value::Null, created).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["outcome"], "suppressed");

    assert_eq!(inbox(&app, "O1").await.len(), 1);
    assert_eq!(app.relay.sent().len(), 1);
}

#[tokio::test]
async fn test_rejection_is_stored_without_notifying() {
    let app = TestApp::new();
    app.seed_marketplace().await;

    let booking_id = create_booking(&app).await;
    let pending = app.booking_document(&booking_id).await;

    let owner = app.token_for("O1");
    let response = app
        .request(
            "POST",
            &format!("/api/bookings/{booking_id}/status"),
            Some(json!({ "status": "rejected" })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let rejected = app.booking_document(&booking_id).await;
    let response = app.fire_trigger(&booking_id, pending, rejected).await;
    assert_eq!(response.body["outcome"], "skipped");
    assert!(inbox(&app, "R1").await.is_empty());
}

#[tokio::test]
async fn test_only_owner_may_accept() {
    let app = TestApp::new();
    app.seed_marketplace().await;
    let booking_id = create_booking(&app).await;

    let renter = app.token_for("R1");
    let response = app
        .request(
            "POST",
            &format!("/api/bookings/{booking_id}/status"),
            Some(json!({ "status": "accepted" })),
            Some(&renter),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "permission-denied");

    let response = app
        .request(
            "POST",
            &format!("/api/bookings/{booking_id}/status"),
            Some(json!({ "status": "cancelled" })),
            Some(&renter),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_status_update_rejects_unknown_status_and_booking() {
    let app = TestApp::new();
    app.seed_marketplace().await;
    let booking_id = create_booking(&app).await;
    let owner = app.token_for("O1");

    let response = app
        .request(
            "POST",
            &format!("/api/bookings/{booking_id}/status"),
            Some(json!({ "status": "archived" })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "invalid-argument");

    let response = app
        .request(
            "POST",
            "/api/bookings/missing/status",
            Some(json!({ "status": "accepted" })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_booking_validation() {
    let app = TestApp::new();
    let renter = app.token_for("R1");

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(json!({
                "equipmentId": "E1",
                "ownerId": "R1",
                "startDate": "2025-06-01T00:00:00Z",
                "endDate": "2025-06-03T00:00:00Z",
                "totalPrice": 200.0,
            })),
            Some(&renter),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(json!({
                "equipmentId": "E1",
                "ownerId": "O1",
                "startDate": "2025-06-01T00:00:00Z",
                "endDate": "2025-06-03T00:00:00Z",
                "totalPrice": 200.0,
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
