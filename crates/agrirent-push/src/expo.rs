//! HTTP client for an Expo-compatible push relay.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use agrirent_core::config::push::PushConfig;
use agrirent_core::error::AppError;
use agrirent_core::result::AppResult;

use crate::error::PushError;
use crate::message::{PushMessage, PushTicket, SendResponse};
use crate::relay::PushRelay;

const SEND_PATH: &str = "/--/api/v2/push/send";

/// Push relay client.
///
/// Each request is bounded by `push.request_timeout_ms`; retryable failures
/// are retried up to `push.max_retries` times with exponential backoff.
#[derive(Debug, Clone)]
pub struct ExpoPushClient {
    client: reqwest::Client,
    send_url: String,
    access_token: Option<String>,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl ExpoPushClient {
    /// Build a client from configuration.
    pub fn new(config: &PushConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Failed to build push relay client: {e}"))
            })?;

        Ok(Self {
            client,
            send_url: format!("{}{SEND_PATH}", config.base_url.trim_end_matches('/')),
            access_token: config
                .access_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
            max_retries: config.max_retries,
            retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
        })
    }

    async fn send_once(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        let mut request = self
            .client
            .post(&self.send_url)
            .header("Accept", "application/json")
            .json(messages);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: SendResponse = response.json().await?;
        Ok(body.data)
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

#[async_trait]
impl PushRelay for ExpoPushClient {
    async fn send(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        let mut attempt = 0;
        loop {
            match self.send_once(messages).await {
                Ok(tickets) => {
                    debug!(messages = messages.len(), attempt, "Push relay accepted batch");
                    return Ok(tickets);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Push relay request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
