//! Claims as Redis keys with `SET NX EX`.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::trace;

use agrirent_core::error::{AppError, ErrorKind};
use agrirent_core::result::AppResult;
use agrirent_core::traits::claim_store::ClaimStore;

use super::client::RedisClient;

/// Claim store shared by every server instance.
#[derive(Debug, Clone)]
pub struct RedisClaimStore {
    client: RedisClient,
}

impl RedisClaimStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

fn redis_error(e: redis::RedisError) -> AppError {
    AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
}

/// Whole seconds, at least 1; Redis rejects `EX 0`.
fn expiry_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl ClaimStore for RedisClaimStore {
    async fn try_claim(&self, key: &str, holder: &str, ttl: Duration) -> AppResult<bool> {
        let key = self.client.key(key);
        let mut conn = self.client.conn();
        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(holder)
            .arg("NX")
            .arg("EX")
            .arg(expiry_secs(ttl))
            .query_async(&mut conn)
            .await
            .map_err(redis_error)?;

        // Nil reply: the key was already set.
        let won = reply.is_some();
        trace!(key = %key, won, "redis claim");
        Ok(won)
    }

    async fn release(&self, key: &str) -> AppResult<()> {
        let mut conn = self.client.conn();
        let _: u64 = conn.del(self.client.key(key)).await.map_err(redis_error)?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn();
        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(redis_error)?;
        Ok(reply == "PONG")
    }
}
