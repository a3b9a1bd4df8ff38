//! # agrirent-notify
//!
//! The booking notification pipeline and the services around it:
//!
//! - [`classifier`]: before/after snapshots to a lifecycle event
//! - [`dedup`]: flag checks and atomic event claims
//! - [`composer`]: recipient, title, body and payload per event
//! - [`dispatcher`]: in-app record first, then push fan-out
//! - [`trigger`]: the per-write entry point tying the steps together
//! - [`booking_service`], [`callables`], [`inbox`]: the user-facing operations

pub mod booking_service;
pub mod callables;
pub mod classifier;
pub mod composer;
pub mod dedup;
pub mod dispatcher;
pub mod inbox;
pub mod trigger;

#[cfg(test)]
pub(crate) mod testing;

pub use booking_service::{BookingService, CreateBookingRequest};
pub use callables::{CallableService, CustomNotificationRequest};
pub use classifier::{ChangeEvent, classify};
pub use composer::ComposedNotification;
pub use dedup::NotificationDeduplicator;
pub use dispatcher::{DeliveryDispatcher, DeliveryResult, PushStatus, SkipReason};
pub use inbox::NotificationService;
pub use trigger::{TriggerAdapter, TriggerError, TriggerInput, TriggerOutcome};
