//! Shared fixtures for the pipeline tests: an in-memory store that can be
//! told to fail, a recording push relay, and a harness wiring both into the
//! services under test.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use agrirent_cache::memory::MemoryClaimStore;
use agrirent_core::config::{PushConfig, TriggerConfig};
use agrirent_core::error::AppError;
use agrirent_core::result::AppResult;
use agrirent_core::traits::claim_store::ClaimStore;
use agrirent_core::traits::document_store::{ChangeStream, DocumentStore};
use agrirent_core::types::{BookingId, Document, UserId, collections};
use agrirent_database::MemoryDocumentStore;
use agrirent_database::repositories::{
    BookingRepository, EquipmentRepository, NotificationRepository, PushTokenRepository,
    UserRepository,
};
use agrirent_entity::booking::{BookingSnapshot, TransitionPolicy};
use agrirent_entity::notification::Notification;
use agrirent_entity::push_token::PushTokenRecord;
use agrirent_push::message::TicketDetails;
use agrirent_push::{PushError, PushMessage, PushRelay, PushTicket};

use crate::booking_service::BookingService;
use crate::callables::CallableService;
use crate::dedup::NotificationDeduplicator;
use crate::dispatcher::DeliveryDispatcher;
use crate::inbox::NotificationService;
use crate::trigger::TriggerAdapter;

/// A valid booking document: owner O1, renter R1, equipment E1.
pub fn booking_doc(status: &str) -> Document {
    json!({
        "equipmentId": "E1",
        "renterId": "R1",
        "ownerId": "O1",
        "startDate": "2025-06-01T00:00:00Z",
        "endDate": "2025-06-03T00:00:00Z",
        "totalPrice": 200.0,
        "status": status,
        "hasNotifiedCreation": false,
        "hasNotifiedStatusChange": false,
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

/// Memory store whose `get` can be made to fail a set number of times per
/// collection.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryDocumentStore,
    failures: Mutex<HashMap<String, usize>>,
}

impl FlakyStore {
    pub fn fail_next_gets(&self, collection: &str, times: usize) {
        self.failures
            .lock()
            .unwrap()
            .insert(collection.to_string(), times);
    }

    fn should_fail(&self, collection: &str) -> bool {
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(collection) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        if self.should_fail(collection) {
            return Err(AppError::database(format!("injected failure reading {collection}/{id}")));
        }
        self.inner.get(collection, id).await
    }

    async fn set(&self, collection: &str, id: &str, document: Document) -> AppResult<()> {
        self.inner.set(collection, id, document).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> AppResult<()> {
        self.inner.update(collection, id, fields).await
    }

    async fn add(&self, collection: &str, document: Document) -> AppResult<String> {
        self.inner.add(collection, document).await
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        self.inner.delete(collection, id).await
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &serde_json::Value,
        limit: usize,
    ) -> AppResult<Vec<(String, Document)>> {
        self.inner.find_by_field(collection, field, value, limit).await
    }

    async fn subscribe(&self, collection: &str) -> AppResult<ChangeStream> {
        self.inner.subscribe(collection).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// How the recording relay answers.
#[derive(Debug, Clone, Default)]
pub enum RelayBehaviour {
    #[default]
    Accept,
    /// Every request fails with HTTP 503.
    Unavailable,
    /// These tokens get a `DeviceNotRegistered` ticket.
    Unregistered(Vec<String>),
    /// Requests containing this token fail with HTTP 503.
    FailChunksContaining(String),
}

/// Push relay that records every message it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingRelay {
    behaviour: RelayBehaviour,
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

        let unavailable = PushError::Http {
            status: 503,
            body: "unavailable".into(),
        };
        match &self.behaviour {
            RelayBehaviour::Unavailable => Err(unavailable),
            RelayBehaviour::FailChunksContaining(token) if messages.iter().any(|m| &m.to == token) => {
                Err(unavailable)
            }
            behaviour => Ok(messages
                .iter()
                .enumerate()
                .map(|(i, m)| match behaviour {
                    RelayBehaviour::Unregistered(tokens) if tokens.contains(&m.to) => {
                        PushTicket::Error {
                            message: format!("{} is not a registered push token", m.to),
                            details: Some(TicketDetails {
                                error: Some("DeviceNotRegistered".into()),
                            }),
                        }
                    }
                    _ => PushTicket::Ok {
                        id: Some(format!("ticket-{i}")),
                    },
                })
                .collect()),
        }
    }
}

/// Services under test over one store, one claim store and one relay.
pub struct Harness {
    pub store: Arc<FlakyStore>,
    pub claims: Arc<dyn ClaimStore>,
    pub relay: Arc<RecordingRelay>,
    pub push_config: PushConfig,
    pub trigger_config: TriggerConfig,
    pub policy: TransitionPolicy,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_relay(RelayBehaviour::Accept)
    }

    pub fn with_relay(behaviour: RelayBehaviour) -> Self {
        Self {
            store: Arc::new(FlakyStore::default()),
            claims: Arc::new(MemoryClaimStore::default()),
            relay: Arc::new(RecordingRelay {
                behaviour,
                sent: Mutex::new(Vec::new()),
            }),
            push_config: PushConfig::default(),
            trigger_config: TriggerConfig {
                fetch_timeout_ms: 1_000,
                write_timeout_ms: 1_000,
                ..TriggerConfig::default()
            },
            policy: TransitionPolicy::default(),
        }
    }

    fn store(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }

    pub fn deduplicator(&self) -> NotificationDeduplicator {
        NotificationDeduplicator::new(
            BookingRepository::new(self.store()),
            Arc::clone(&self.claims),
            Duration::from_secs(self.trigger_config.claim_ttl_seconds),
        )
    }

    pub fn dispatcher(&self) -> DeliveryDispatcher {
        DeliveryDispatcher::new(
            NotificationRepository::new(self.store()),
            PushTokenRepository::new(self.store()),
            self.relay.clone(),
            self.push_config.clone(),
        )
    }

    pub fn trigger(&self) -> TriggerAdapter {
        TriggerAdapter::new(
            EquipmentRepository::new(self.store()),
            UserRepository::new(self.store()),
            self.deduplicator(),
            self.dispatcher(),
            self.policy.clone(),
            &self.trigger_config,
        )
    }

    pub fn booking_service(&self) -> BookingService {
        BookingService::new(BookingRepository::new(self.store()), self.policy.clone())
    }

    pub fn callables(&self) -> CallableService {
        CallableService::new(PushTokenRepository::new(self.store()), self.dispatcher())
    }

    pub fn inbox(&self) -> NotificationService {
        NotificationService::new(NotificationRepository::new(self.store()))
    }

    /// Store a valid booking under `id`.
    pub async fn seed_booking(&self, id: &str, status: &str) -> BookingId {
        self.store
            .set(collections::BOOKINGS, id, booking_doc(status))
            .await
            .unwrap();
        BookingId::new(id)
    }

    pub async fn booking_snapshot(&self, id: &BookingId) -> BookingSnapshot {
        BookingRepository::new(self.store())
            .find_snapshot(id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn seed_equipment(&self, id: &str, name: &str) {
        let doc = json!({ "name": name }).as_object().cloned().unwrap();
        self.store.set(collections::EQUIPMENT, id, doc).await.unwrap();
    }

    pub async fn seed_user(&self, id: &str, name: &str) {
        let doc = json!({ "name": name }).as_object().cloned().unwrap();
        self.store.set(collections::USERS, id, doc).await.unwrap();
    }

    pub async fn register_token(&self, user: &str, token: &str) {
        PushTokenRepository::new(self.store())
            .upsert(&UserId::new(user), token)
            .await
            .unwrap();
    }

    pub async fn token_of(&self, user: &str) -> Option<PushTokenRecord> {
        PushTokenRepository::new(self.store())
            .find(&UserId::new(user))
            .await
            .unwrap()
    }

    pub async fn notifications_for(&self, user: &str) -> Vec<Notification> {
        NotificationRepository::new(self.store())
            .list_for_user(&UserId::new(user), 100)
            .await
            .unwrap()
    }
}
