//! Claim store selection from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use agrirent_core::config::cache::{CacheBackend, CacheConfig};
use agrirent_core::error::AppError;
use agrirent_core::result::AppResult;
use agrirent_core::traits::claim_store::ClaimStore;

/// Build the claim store named by `cache.provider`.
pub async fn connect_claim_store(config: &CacheConfig) -> AppResult<Arc<dyn ClaimStore>> {
    match config.provider {
        #[cfg(feature = "memory")]
        CacheBackend::Memory => {
            warn!("Using in-memory claim store; duplicate notifications are possible across instances");
            Ok(Arc::new(crate::memory::MemoryClaimStore::new(&config.memory)))
        }
        #[cfg(feature = "redis-backend")]
        CacheBackend::Redis => {
            let client = crate::redis::RedisClient::connect(&config.redis).await?;
            info!("Using Redis claim store");
            Ok(Arc::new(crate::redis::RedisClaimStore::new(client)))
        }
        #[allow(unreachable_patterns)]
        other => Err(AppError::configuration(format!(
            "Claim store backend {other:?} is not compiled in"
        ))),
    }
}
