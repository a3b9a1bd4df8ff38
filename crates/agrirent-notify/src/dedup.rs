//! At-most-once guards for booking notifications.
//!
//! Two layers protect each lifecycle event:
//!
//! 1. The `hasNotified*` flags on the booking record, checked against the
//!    snapshot that triggered the invocation.
//! 2. A claim in the idempotency store, taken with an atomic set-if-absent
//!    so that concurrent or redelivered invocations of the same event
//!    cannot both proceed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use agrirent_cache::keys;
use agrirent_core::result::AppResult;
use agrirent_core::traits::claim_store::ClaimStore;
use agrirent_core::types::BookingId;
use agrirent_database::repositories::BookingRepository;
use agrirent_entity::booking::{BookingSnapshot, NotificationFlag};

use crate::classifier::ChangeEvent;

/// The flag guarding `event`, if the event can notify at all.
pub fn flag_for(event: &ChangeEvent<'_>) -> Option<NotificationFlag> {
    match event {
        ChangeEvent::Created { .. } => Some(NotificationFlag::Creation),
        ChangeEvent::StatusChanged { .. } => Some(NotificationFlag::StatusChange),
        ChangeEvent::Deleted | ChangeEvent::NoOp => None,
    }
}

/// Whether `event` still needs handling given the triggering snapshot.
pub fn should_notify(event: &ChangeEvent<'_>, after: &BookingSnapshot) -> bool {
    flag_for(event).is_some_and(|flag| !flag.is_set(after))
}

/// Idempotency-store key for `event` on `booking_id`.
pub fn claim_key(booking_id: &BookingId, event: &ChangeEvent<'_>) -> Option<String> {
    match event {
        ChangeEvent::Created { .. } => Some(keys::notification_created(booking_id.as_str())),
        ChangeEvent::StatusChanged { old, new, .. } => Some(keys::notification_status_change(
            booking_id.as_str(),
            old.as_deref().unwrap_or("none"),
            new.as_deref().unwrap_or("none"),
        )),
        ChangeEvent::Deleted | ChangeEvent::NoOp => None,
    }
}

/// Claims events and writes the booking flags.
#[derive(Debug, Clone)]
pub struct NotificationDeduplicator {
    bookings: BookingRepository,
    claims: Arc<dyn ClaimStore>,
    claim_ttl: Duration,
}

impl NotificationDeduplicator {
    /// Create a deduplicator whose claims live for `claim_ttl`.
    pub fn new(
        bookings: BookingRepository,
        claims: Arc<dyn ClaimStore>,
        claim_ttl: Duration,
    ) -> Self {
        Self {
            bookings,
            claims,
            claim_ttl,
        }
    }

    /// Try to take the claim on `key`. Exactly one caller wins.
    pub async fn claim(&self, key: &str) -> AppResult<bool> {
        let won = self
            .claims
            .try_claim(key, &Utc::now().to_rfc3339(), self.claim_ttl)
            .await?;
        debug!(key, won, "Notification claim");
        Ok(won)
    }

    /// Give a claim back so a later redelivery can retry the event.
    pub async fn release(&self, key: &str) {
        if let Err(e) = self.claims.release(key).await {
            warn!(key, error = %e, "Failed to release notification claim");
        }
    }

    /// Set the flag for an event on the booking record.
    pub async fn mark_notified(&self, booking_id: &BookingId, flag: NotificationFlag) -> AppResult<()> {
        self.bookings.mark_flag(booking_id, flag).await
    }
}
