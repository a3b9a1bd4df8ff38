//! Idempotency store configuration.
//!
//! Claim lifetimes come from `trigger.claim_ttl_seconds`; this section only
//! picks and sizes the backend.

use serde::{Deserialize, Serialize};

/// Which backend holds notification claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local. Only safe with a single server instance.
    #[default]
    Memory,
    /// Shared across instances.
    Redis,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub provider: CacheBackend,
    #[serde(default)]
    pub redis: RedisCacheConfig,
    #[serde(default)]
    pub memory: MemoryCacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prepended to every claim key.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Deadline for the initial connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            namespace: default_namespace(),
            connect_timeout_ms: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Live claims kept before the least recently used are evicted.
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_namespace() -> String {
    "agrirent:claims:".to_string()
}

fn default_connect_timeout() -> u64 {
    5_000
}

fn default_max_entries() -> u64 {
    100_000
}
