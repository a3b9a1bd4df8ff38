//! In-process claim store on moka.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::trace;

use agrirent_core::config::cache::MemoryCacheConfig;
use agrirent_core::result::AppResult;
use agrirent_core::traits::claim_store::ClaimStore;

#[derive(Debug, Clone)]
struct Claim {
    holder: String,
    ttl: Duration,
}

/// Each claim expires after the TTL it was taken with.
struct ClaimExpiry;

impl Expiry<String, Claim> for ClaimExpiry {
    fn expire_after_create(&self, _key: &String, claim: &Claim, _created_at: Instant) -> Option<Duration> {
        Some(claim.ttl)
    }
}

/// Claims held in this process only.
#[derive(Debug, Clone)]
pub struct MemoryClaimStore {
    claims: Cache<String, Claim>,
}

impl MemoryClaimStore {
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let claims = Cache::builder()
            .max_capacity(config.max_entries)
            .expire_after(ClaimExpiry)
            .build();
        Self { claims }
    }

    /// Who holds `key`, if anyone.
    pub async fn holder(&self, key: &str) -> Option<String> {
        self.claims.get(key).await.map(|c| c.holder)
    }
}

impl Default for MemoryClaimStore {
    fn default() -> Self {
        Self::new(&MemoryCacheConfig::default())
    }
}

#[async_trait]
impl ClaimStore for MemoryClaimStore {
    async fn try_claim(&self, key: &str, holder: &str, ttl: Duration) -> AppResult<bool> {
        // Insertion runs under moka's per-key lock: one caller sees a fresh entry.
        let entry = self
            .claims
            .entry(key.to_string())
            .or_insert(Claim {
                holder: holder.to_string(),
                ttl,
            })
            .await;
        let won = entry.is_fresh();
        trace!(key, won, "memory claim");
        Ok(won)
    }

    async fn release(&self, key: &str) -> AppResult<()> {
        self.claims.invalidate(key).await;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
