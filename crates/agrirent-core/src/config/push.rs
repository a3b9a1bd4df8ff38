//! Push relay configuration.

use serde::{Deserialize, Serialize};

/// Largest batch the push relay accepts in one request.
pub const RELAY_BATCH_LIMIT: usize = 100;

/// Push relay client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Whether push delivery is attempted at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Relay base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional relay access token sent as a bearer credential.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Messages per relay request; clamped to [`RELAY_BATCH_LIMIT`].
    #[serde(default = "default_batch_size")]
    pub max_batch_size: usize,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Retries for retryable relay failures (0 disables retry).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay for exponential backoff in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_base_delay_ms: u64,
    /// Delete a user's token when the relay reports it as unregistered.
    #[serde(default = "default_true")]
    pub prune_unregistered_tokens: bool,
}

impl PushConfig {
    /// Batch size actually used when chunking.
    pub fn effective_batch_size(&self) -> usize {
        self.max_batch_size.clamp(1, RELAY_BATCH_LIMIT)
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            access_token: None,
            max_batch_size: default_batch_size(),
            request_timeout_ms: default_request_timeout(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_delay(),
            prune_unregistered_tokens: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://exp.host".to_string()
}

fn default_batch_size() -> usize {
    RELAY_BATCH_LIMIT
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    250
}
