//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use agrirent_api::auth::Claims;
use agrirent_api::{AppState, build_router};
use agrirent_cache::memory::MemoryClaimStore;
use agrirent_core::config::AppConfig;
use agrirent_core::traits::document_store::DocumentStore;
use agrirent_core::types::{Document, collections};
use agrirent_database::MemoryDocumentStore;
use agrirent_push::{PushError, PushMessage, PushRelay, PushTicket};

/// Valid relay tokens for test users.
pub const OWNER_TOKEN: &str = "ExponentPushToken[owner-device]";
pub const RENTER_TOKEN: &str = "ExponentPushToken[renter-device]";

/// Relay stand-in that accepts everything and keeps what it was sent.
#[derive(Debug, Default)]
pub struct RecordingRelay {
    sent: Mutex<Vec<PushMessage>>,
}

impl RecordingRelay {
    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushRelay for RecordingRelay {
    async fn send(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        self.sent.lock().unwrap().extend_from_slice(messages);
        Ok(messages
            .iter()
            .map(|_| PushTicket::Ok {
                id: Some("ticket".into()),
            })
            .collect())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Document store for direct reads and seeding
    pub store: Arc<dyn DocumentStore>,
    pub relay: Arc<RecordingRelay>,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Self::default_config())
    }

    pub fn default_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-secret".into();
        config.auth.leeway_seconds = 0;
        config
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::default());
        let claims = Arc::new(MemoryClaimStore::new(&config.cache.memory));
        let relay = Arc::new(RecordingRelay::default());

        let state = AppState::build(
            config.clone(),
            Arc::clone(&store),
            claims,
            Arc::clone(&relay) as Arc<dyn PushRelay>,
        )
        .expect("Failed to build app state");

        Self {
            router: build_router(state),
            store,
            relay,
            config,
        }
    }

    /// Mint a caller token for `user`.
    pub fn token_for(&self, user: &str) -> String {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: user.into(),
            exp: now + 600,
            iat: Some(now),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.auth.jwt_secret.as_bytes()),
        )
        .expect("Failed to sign token")
    }

    pub async fn seed(&self, collection: &str, id: &str, doc: Value) {
        let doc: Document = doc.as_object().cloned().expect("seed must be an object");
        self.store
            .set(collection, id, doc)
            .await
            .expect("Failed to seed document");
    }

    /// Equipment E1 owned by O1, renter R1 named Alice, both with devices.
    pub async fn seed_marketplace(&self) {
        self.seed(collections::EQUIPMENT, "E1", json!({ "name": "Tractor" }))
            .await;
        self.seed(collections::USERS, "R1", json!({ "name": "Alice" }))
            .await;
        for (user, token) in [("O1", OWNER_TOKEN), ("R1", RENTER_TOKEN)] {
            let caller = self.token_for(user);
            let response = self
                .request(
                    "POST",
                    "/api/push-tokens",
                    Some(json!({ "token": token })),
                    Some(&caller),
                )
                .await;
            assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        }
    }

    pub async fn booking_document(&self, id: &str) -> Value {
        let doc = self
            .store
            .get(collections::BOOKINGS, id)
            .await
            .expect("Failed to read booking")
            .expect("Booking not found");
        Value::Object(doc)
    }

    /// Post one booking write to the trigger webhook.
    pub async fn fire_trigger(&self, booking_id: &str, before: Value, after: Value) -> TestResponse {
        self.request(
            "POST",
            "/internal/triggers/bookings",
            Some(json!({
                "bookingId": booking_id,
                "before": before,
                "after": after,
            })),
            None,
        )
        .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_with_headers(method, path, body, token, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
