//! Booking trigger processing configuration.

use serde::{Deserialize, Serialize};

/// Settings for the trigger adapter and the change-feed worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Deadline for each related-entity fetch in milliseconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_ms: u64,
    /// Deadline for each document write in milliseconds.
    #[serde(default = "default_write_timeout")]
    pub write_timeout_ms: u64,
    /// Lifetime of an idempotency claim in seconds.
    #[serde(default = "default_claim_ttl")]
    pub claim_ttl_seconds: u64,
    /// Shared secret expected in `x-trigger-secret` on the webhook.
    #[serde(default)]
    pub webhook_secret: Option<String>,
    /// Consume the document store's change feed in-process.
    #[serde(default = "default_true")]
    pub change_feed: bool,
    /// Maximum bookings processed concurrently by the worker.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Attempts per change before a retryable failure is given up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay between worker retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_base_delay_ms: u64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout(),
            write_timeout_ms: default_write_timeout(),
            claim_ttl_seconds: default_claim_ttl(),
            webhook_secret: None,
            change_feed: true,
            concurrency: default_concurrency(),
            max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_retry_delay(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    5_000
}

fn default_write_timeout() -> u64 {
    5_000
}

fn default_claim_ttl() -> u64 {
    7 * 24 * 3600
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    8
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    500
}
