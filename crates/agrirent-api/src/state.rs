//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use agrirent_core::config::AppConfig;
use agrirent_core::result::AppResult;
use agrirent_core::traits::claim_store::ClaimStore;
use agrirent_core::traits::document_store::DocumentStore;
use agrirent_database::repositories::{
    BookingRepository, EquipmentRepository, NotificationRepository, PushTokenRepository,
    UserRepository,
};
use agrirent_entity::booking::TransitionPolicy;
use agrirent_notify::{
    BookingService, CallableService, DeliveryDispatcher, NotificationDeduplicator,
    NotificationService, TriggerAdapter,
};
use agrirent_push::PushRelay;

use crate::auth::JwtVerifier;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Document store (memory or PostgreSQL).
    pub store: Arc<dyn DocumentStore>,
    /// Notification claims (memory or Redis).
    pub claims: Arc<dyn ClaimStore>,
    pub jwt: Arc<JwtVerifier>,

    // ── Services ─────────────────────────────────────────────
    pub bookings: Arc<BookingService>,
    pub callables: Arc<CallableService>,
    pub inbox: Arc<NotificationService>,
    pub trigger: Arc<TriggerAdapter>,
}

impl AppState {
    /// Wire repositories and services over the given backends.
    pub fn build(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        claims: Arc<dyn ClaimStore>,
        relay: Arc<dyn PushRelay>,
    ) -> AppResult<Self> {
        let policy = TransitionPolicy::from_config(&config.booking)?;

        let booking_repo = BookingRepository::new(Arc::clone(&store));
        let notification_repo = NotificationRepository::new(Arc::clone(&store));
        let push_token_repo = PushTokenRepository::new(Arc::clone(&store));

        let dispatcher = DeliveryDispatcher::new(
            notification_repo.clone(),
            push_token_repo.clone(),
            relay,
            config.push.clone(),
        );
        let dedup = NotificationDeduplicator::new(
            booking_repo.clone(),
            Arc::clone(&claims),
            Duration::from_secs(config.trigger.claim_ttl_seconds),
        );
        let trigger = TriggerAdapter::new(
            EquipmentRepository::new(Arc::clone(&store)),
            UserRepository::new(Arc::clone(&store)),
            dedup,
            dispatcher.clone(),
            policy.clone(),
            &config.trigger,
        );

        Ok(Self {
            jwt: Arc::new(JwtVerifier::new(&config.auth)),
            bookings: Arc::new(BookingService::new(booking_repo, policy)),
            callables: Arc::new(CallableService::new(push_token_repo, dispatcher)),
            inbox: Arc::new(NotificationService::new(notification_repo)),
            trigger: Arc::new(trigger),
            config: Arc::new(config),
            store,
            claims,
        })
    }
}
