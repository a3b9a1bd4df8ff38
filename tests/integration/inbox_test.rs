//! Integration tests for the notification inbox.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

async fn send(app: &TestApp, target: &str, title: &str) -> String {
    let caller = app.token_for("admin");
    let response = app
        .request(
            "POST",
            "/api/notifications/send",
            Some(json!({ "targetUserId": target, "title": title, "body": "body" })),
            Some(&caller),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["notificationId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_inbox_lists_newest_first_and_respects_limit() {
    let app = TestApp::new();
    for title in ["first", "second", "third"] {
        send(&app, "U1", title).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    send(&app, "U2", "other").await;

    let caller = app.token_for("U1");
    let response = app
        .request("GET", "/api/notifications", None, Some(&caller))
        .await;
    let titles: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["third", "second", "first"]);

    let response = app
        .request("GET", "/api/notifications?limit=1", None, Some(&caller))
        .await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_mark_read_is_recipient_only() {
    let app = TestApp::new();
    let id = send(&app, "U1", "hello").await;

    let response = app
        .request(
            "POST",
            &format!("/api/notifications/{id}/read"),
            None,
            Some(&app.token_for("U2")),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let owner = app.token_for("U1");
    let response = app
        .request("POST", &format!("/api/notifications/{id}/read"), None, Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["read"], true);

    let inbox = app
        .request("GET", "/api/notifications", None, Some(&owner))
        .await;
    assert_eq!(inbox.body[0]["read"], true);
}

#[tokio::test]
async fn test_mark_read_unknown_notification() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/notifications/nope/read",
            None,
            Some(&app.token_for("U1")),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "not-found");
}

#[tokio::test]
async fn test_inbox_requires_caller() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/notifications", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
