//! Idempotency claims for notification events.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// A shared set of short-lived claims keyed by event.
///
/// Claims are how concurrent deliveries of the same booking event agree on
/// which one sends the notification.
#[async_trait]
pub trait ClaimStore: Send + Sync + std::fmt::Debug + 'static {
    /// Record `holder` under `key` unless a live claim already exists.
    ///
    /// Atomic: of any number of concurrent callers for one key exactly one
    /// gets `true`. The claim lapses after `ttl`.
    async fn try_claim(&self, key: &str, holder: &str, ttl: Duration) -> AppResult<bool>;

    /// Drop the claim on `key`. Releasing a free key succeeds.
    async fn release(&self, key: &str) -> AppResult<()>;

    async fn health_check(&self) -> AppResult<bool>;
}
