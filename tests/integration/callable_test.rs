//! Integration tests for the client-invoked callables.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{RENTER_TOKEN, TestApp};

#[tokio::test]
async fn test_register_push_token_requires_caller() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/push-tokens",
            Some(json!({ "token": RENTER_TOKEN })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "unauthenticated");
}

#[tokio::test]
async fn test_register_push_token_rejects_bad_tokens() {
    let app = TestApp::new();
    let caller = app.token_for("R1");

    for body in [json!({}), json!({ "token": "   " }), json!({ "token": "not-a-token" })] {
        let response = app
            .request("POST", "/api/push-tokens", Some(body), Some(&caller))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "invalid-argument");
    }
}

#[tokio::test]
async fn test_register_push_token_replaces_previous() {
    let app = TestApp::new();
    let caller = app.token_for("R1");

    for token in ["ExponentPushToken[first]", RENTER_TOKEN] {
        let response = app
            .request(
                "POST",
                "/api/push-tokens",
                Some(json!({ "token": token })),
                Some(&caller),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["success"], true);
    }

    let response = app
        .request(
            "POST",
            "/api/notifications/send",
            Some(json!({ "targetUserId": "R1", "title": "Hi", "body": "There" })),
            Some(&caller),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let sent = app.relay.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, RENTER_TOKEN);
}

#[tokio::test]
async fn test_rejects_forged_caller_token() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/push-tokens",
            Some(json!({ "token": RENTER_TOKEN })),
            Some("not.a.jwt"),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_send_custom_notification() {
    let app = TestApp::new();
    app.seed_marketplace().await;
    let caller = app.token_for("O1");

    let response = app
        .request(
            "POST",
            "/api/notifications/send",
            Some(json!({
                "targetUserId": "R1",
                "title": "Pickup reminder",
                "body": "Collect the tractor at 9am",
                "data": { "kind": "reminder" },
            })),
            Some(&caller),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["push"]["status"], "sent");
    assert!(!response.body["notificationId"].as_str().unwrap().is_empty());

    let sent = app.relay.sent();
    let reminder = sent.last().unwrap();
    assert_eq!(reminder.to, RENTER_TOKEN);
    assert_eq!(reminder.title, "Pickup reminder");
    assert_eq!(reminder.data.get("kind").map(String::as_str), Some("reminder"));
}

#[tokio::test]
async fn test_send_custom_notification_without_device_is_stored() {
    let app = TestApp::new();
    let caller = app.token_for("O1");

    let response = app
        .request(
            "POST",
            "/api/notifications/send",
            Some(json!({ "targetUserId": "U9", "title": "Hello", "body": "World" })),
            Some(&caller),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["push"]["status"], "skipped");
    assert!(app.relay.sent().is_empty());

    let inbox = app
        .request("GET", "/api/notifications", None, Some(&app.token_for("U9")))
        .await;
    assert_eq!(inbox.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_send_custom_notification_argument_errors() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/notifications/send",
            Some(json!({ "targetUserId": "R1", "title": "t", "body": "b" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let caller = app.token_for("O1");
    for body in [
        json!({ "title": "t", "body": "b" }),
        json!({ "targetUserId": "R1", "body": "b" }),
        json!({ "targetUserId": "R1", "title": "t", "body": "" }),
    ] {
        let response = app
            .request("POST", "/api/notifications/send", Some(body), Some(&caller))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "invalid-argument");
    }
}
