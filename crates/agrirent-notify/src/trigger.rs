//! Trigger adapter: the per-write entry point of the notification pipeline.
//!
//! One invocation handles one booking write. Steps run strictly in order:
//! classify, validate, flag check, transition policy, claim, fetch related
//! records, compose, dispatch, mark. No error escapes [`TriggerAdapter::handle`];
//! every failure is logged with the booking id and step and folded into the
//! returned [`TriggerOutcome`].

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use agrirent_core::config::TriggerConfig;
use agrirent_core::error::AppError;
use agrirent_core::result::AppResult;
use agrirent_core::types::{BookingId, Document, DocumentChange};
use agrirent_database::repositories::{EquipmentRepository, UserRepository};
use agrirent_entity::booking::{
    Booking, BookingSnapshot, BookingStatus, NotificationFlag, TransitionError, TransitionPolicy,
    ValidationError, validate,
};
use agrirent_entity::equipment::Equipment;
use agrirent_entity::user::UserProfile;

use crate::classifier::{ChangeEvent, classify};
use crate::composer::{compose_created, compose_status_change, notifies_on};
use crate::dedup::{NotificationDeduplicator, claim_key, flag_for, should_notify};
use crate::dispatcher::{DeliveryDispatcher, DeliveryResult};

/// One booking write as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerInput {
    pub booking_id: BookingId,
    #[serde(default)]
    pub before: Option<Document>,
    #[serde(default)]
    pub after: Option<Document>,
}

impl From<DocumentChange> for TriggerInput {
    fn from(change: DocumentChange) -> Self {
        Self {
            booking_id: BookingId::new(change.id),
            before: change.before,
            after: change.after,
        }
    }
}

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    /// The write carries nothing to notify about (deletion, no status
    /// change, missing or invalid data).
    Ignored(String),
    /// The event was handled without a notification (non-notifying status).
    Skipped(String),
    /// Another invocation already handled or is handling the event, or the
    /// transition is outside the policy.
    Suppressed(String),
    /// A notification was delivered.
    Delivered(DeliveryResult),
    /// Processing failed. Retryable failures leave the event unmarked.
    Failed { reason: String, retryable: bool },
}

impl TriggerOutcome {
    /// Short name used in logs and webhook responses.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ignored(_) => "ignored",
            Self::Skipped(_) => "skipped",
            Self::Suppressed(_) => "suppressed",
            Self::Delivered(_) => "delivered",
            Self::Failed { .. } => "failed",
        }
    }

    /// Whether redelivering the same write may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed { retryable: true, .. })
    }
}

/// Failures inside one invocation.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// The booking record breaks an invariant. Nothing is marked.
    #[error("invalid booking: {0}")]
    Validation(#[from] ValidationError),
    /// The status change is outside the configured transition policy.
    #[error(transparent)]
    TransitionNotAllowed(#[from] TransitionError),
    /// A dependency failed in a way that may pass on retry.
    #[error("{step} failed: {source}")]
    Transient { step: &'static str, source: AppError },
    /// A dependency failed in a way that will not pass on retry.
    #[error("{step} failed permanently: {source}")]
    Permanent { step: &'static str, source: AppError },
}

impl TriggerError {
    fn from_app(step: &'static str, source: AppError) -> Self {
        if source.is_retryable() {
            Self::Transient { step, source }
        } else {
            Self::Permanent { step, source }
        }
    }
}

/// Reacts to booking writes with at-most-once notifications.
#[derive(Debug, Clone)]
pub struct TriggerAdapter {
    equipment: EquipmentRepository,
    users: UserRepository,
    dedup: NotificationDeduplicator,
    dispatcher: DeliveryDispatcher,
    policy: TransitionPolicy,
    fetch_timeout: Duration,
    write_timeout: Duration,
}

impl TriggerAdapter {
    pub fn new(
        equipment: EquipmentRepository,
        users: UserRepository,
        dedup: NotificationDeduplicator,
        dispatcher: DeliveryDispatcher,
        policy: TransitionPolicy,
        config: &TriggerConfig,
    ) -> Self {
        Self {
            equipment,
            users,
            dedup,
            dispatcher,
            policy,
            fetch_timeout: Duration::from_millis(config.fetch_timeout_ms),
            write_timeout: Duration::from_millis(config.write_timeout_ms),
        }
    }

    /// Handle one booking write.
    pub async fn handle(&self, input: &TriggerInput) -> TriggerOutcome {
        let booking_id = &input.booking_id;
        let event = classify(input.before.as_ref(), input.after.as_ref());
        let after = match &event {
            ChangeEvent::Deleted => {
                debug!(booking_id = %booking_id, "Booking deleted, nothing to notify");
                return TriggerOutcome::Ignored("booking deleted".to_string());
            }
            ChangeEvent::NoOp => {
                debug!(booking_id = %booking_id, "Status unchanged, nothing to notify");
                return TriggerOutcome::Ignored("status unchanged".to_string());
            }
            ChangeEvent::Created { after } | ChangeEvent::StatusChanged { after, .. } => *after,
        };

        if booking_id.is_blank() {
            warn!(event = event.name(), "Trigger invoked without a booking id");
            return TriggerOutcome::Ignored("missing booking id".to_string());
        }
        let Some(flag) = flag_for(&event) else {
            return TriggerOutcome::Ignored("event does not notify".to_string());
        };

        let validated = BookingSnapshot::from_document(after)
            .and_then(|snapshot| validate(booking_id, &snapshot).map(|b| (snapshot, b)));
        let (snapshot, booking) = match validated {
            Ok(pair) => pair,
            Err(e) => {
                warn!(booking_id = %booking_id, event = event.name(), step = "validate", error = %e, "Invalid booking record");
                return TriggerOutcome::Ignored(TriggerError::Validation(e).to_string());
            }
        };

        if !should_notify(&event, &snapshot) {
            debug!(booking_id = %booking_id, event = event.name(), "Already notified");
            return TriggerOutcome::Suppressed("already notified".to_string());
        }

        match self.process(booking_id, &event, &booking, flag).await {
            Ok(outcome) => {
                info!(booking_id = %booking_id, event = event.name(), outcome = outcome.label(), "Booking trigger handled");
                outcome
            }
            Err(TriggerError::TransitionNotAllowed(e)) => {
                warn!(booking_id = %booking_id, step = "policy", error = %e, "Transition not allowed, dropping event");
                self.mark(booking_id, flag).await;
                TriggerOutcome::Suppressed(e.to_string())
            }
            Err(TriggerError::Validation(e)) => TriggerOutcome::Ignored(e.to_string()),
            Err(e @ TriggerError::Transient { .. }) => {
                warn!(booking_id = %booking_id, event = event.name(), error = %e, "Booking trigger failed, will retry");
                TriggerOutcome::Failed {
                    reason: e.to_string(),
                    retryable: true,
                }
            }
            Err(e @ TriggerError::Permanent { .. }) => {
                error!(booking_id = %booking_id, event = event.name(), error = %e, "Booking trigger failed permanently");
                TriggerOutcome::Failed {
                    reason: e.to_string(),
                    retryable: false,
                }
            }
        }
    }

    async fn process(
        &self,
        booking_id: &BookingId,
        event: &ChangeEvent<'_>,
        booking: &Booking,
        flag: NotificationFlag,
    ) -> Result<TriggerOutcome, TriggerError> {
        if let ChangeEvent::StatusChanged { old, .. } = event {
            // An unknown previous status cannot be checked against the table.
            if let Some(old) = old.as_deref().and_then(|s| s.parse::<BookingStatus>().ok()) {
                self.policy.check(old, booking.status)?;
            }
        }

        let Some(key) = claim_key(booking_id, event) else {
            return Ok(TriggerOutcome::Ignored("event does not notify".to_string()));
        };
        let claimed = with_deadline(self.write_timeout, self.dedup.claim(&key))
            .await
            .map_err(|source| TriggerError::Transient {
                step: "claim",
                source,
            })?;
        if !claimed {
            debug!(booking_id = %booking_id, key = %key, "Event claimed by another invocation");
            return Ok(TriggerOutcome::Suppressed("event already claimed".to_string()));
        }

        match self.deliver(event, booking).await {
            Err(e @ TriggerError::Transient { .. }) => {
                self.dedup.release(&key).await;
                Err(e)
            }
            other => {
                self.mark(booking_id, flag).await;
                other
            }
        }
    }

    async fn deliver(&self, event: &ChangeEvent<'_>, booking: &Booking) -> Result<TriggerOutcome, TriggerError> {
        let created = matches!(event, ChangeEvent::Created { .. });
        if !created && !notifies_on(booking.status) {
            return Ok(TriggerOutcome::Skipped(format!(
                "status '{}' does not notify",
                booking.status
            )));
        }

        let (equipment, requester) = self.fetch_related(booking, created).await?;
        let composed = if created {
            Some(compose_created(booking, equipment.as_ref(), requester.as_ref()))
        } else {
            compose_status_change(booking, equipment.as_ref())
        };
        let Some(composed) = composed else {
            return Ok(TriggerOutcome::Skipped("nothing to compose".to_string()));
        };

        let result = self
            .dispatcher
            .dispatch(&composed)
            .await
            .map_err(|e| TriggerError::from_app("dispatch", e))?;
        Ok(TriggerOutcome::Delivered(result))
    }

    /// Equipment and (for creations) the requesting renter, fetched
    /// concurrently. Missing records fall back to default text.
    async fn fetch_related(
        &self,
        booking: &Booking,
        with_requester: bool,
    ) -> Result<(Option<Equipment>, Option<UserProfile>), TriggerError> {
        let equipment = self.fetch("fetch_equipment", self.equipment.find(&booking.equipment_id));
        let requester = async {
            if with_requester {
                self.fetch("fetch_requester", self.users.find(&booking.renter_id))
                    .await
            } else {
                Ok(None)
            }
        };
        let (equipment, requester) = tokio::join!(equipment, requester);
        Ok((equipment?, requester?))
    }

    async fn fetch<T>(
        &self,
        step: &'static str,
        lookup: impl Future<Output = AppResult<Option<T>>>,
    ) -> Result<Option<T>, TriggerError> {
        let found = with_deadline(self.fetch_timeout, lookup)
            .await
            .map_err(|e| TriggerError::from_app(step, e))?;
        if found.is_none() {
            debug!(step, "Related record not found, using fallback text");
        }
        Ok(found)
    }

    async fn mark(&self, booking_id: &BookingId, flag: NotificationFlag) {
        match with_deadline(self.write_timeout, self.dedup.mark_notified(booking_id, flag)).await {
            Ok(()) => debug!(booking_id = %booking_id, flag = flag.field(), "Booking marked notified"),
            Err(e) => error!(
                booking_id = %booking_id,
                flag = flag.field(),
                step = "mark",
                error = %e,
                "Failed to mark booking notified"
            ),
        }
    }
}

async fn with_deadline<T>(deadline: Duration, fut: impl Future<Output = AppResult<T>>) -> AppResult<T> {
    tokio::time::timeout(deadline, fut).await?
}
