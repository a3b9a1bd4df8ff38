//! Change-feed runner: consumes booking writes and hands them to the
//! trigger adapter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use agrirent_core::config::TriggerConfig;
use agrirent_core::result::AppResult;
use agrirent_core::traits::document_store::DocumentStore;
use agrirent_core::types::collections;
use agrirent_notify::{TriggerAdapter, TriggerInput, TriggerOutcome};

use crate::queue::KeyedQueue;

/// How long shutdown waits for in-flight changes.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Consumes the `bookings` change feed.
///
/// The receive loop never waits on processing: each change is queued under
/// its booking id before anything is spawned, and one task per active
/// booking drains that queue while holding a concurrency permit.
#[derive(Debug, Clone)]
pub struct ChangeFeedWorker {
    store: Arc<dyn DocumentStore>,
    trigger: Arc<TriggerAdapter>,
    queue: KeyedQueue<TriggerInput>,
    permits: Arc<Semaphore>,
    missed: Arc<AtomicU64>,
    concurrency: usize,
    max_attempts: u32,
    retry_base_delay: Duration,
}

impl ChangeFeedWorker {
    pub fn new(store: Arc<dyn DocumentStore>, trigger: Arc<TriggerAdapter>, config: &TriggerConfig) -> Self {
        let concurrency = config.concurrency.max(1);
        Self {
            store,
            trigger,
            queue: KeyedQueue::new(),
            permits: Arc::new(Semaphore::new(concurrency)),
            missed: Arc::new(AtomicU64::new(0)),
            concurrency,
            max_attempts: config.max_attempts.max(1),
            retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
        }
    }

    /// Changes the feed dropped because the worker fell behind.
    pub fn missed_changes(&self) -> u64 {
        self.missed.load(Ordering::Relaxed)
    }

    /// Run until `cancel` turns true or the feed closes.
    ///
    /// Fails only when the store cannot provide a change feed.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) -> AppResult<()> {
        let mut changes = self.store.subscribe(collections::BOOKINGS).await?;
        let mut drainers = JoinSet::new();
        info!(concurrency = self.concurrency, max_attempts = self.max_attempts, "Change-feed worker started");

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Change-feed worker received shutdown signal");
                        break;
                    }
                }
                Some(joined) = drainers.join_next(), if !drainers.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Change-feed task aborted");
                    }
                }
                change = changes.recv() => match change {
                    Ok(change) => self.enqueue(TriggerInput::from(change), &mut drainers),
                    Err(RecvError::Lagged(missed)) => {
                        let total = self.missed.fetch_add(missed, Ordering::Relaxed) + missed;
                        error!(
                            missed,
                            total_missed = total,
                            "Change-feed worker fell behind; booking writes were dropped and will not notify"
                        );
                    }
                    Err(RecvError::Closed) => {
                        info!("Change feed closed");
                        break;
                    }
                },
            }
        }

        info!(
            active = self.queue.active_keys(),
            backlog = self.queue.backlog(),
            "Change-feed worker waiting for in-flight changes"
        );
        let drained = tokio::time::timeout(DRAIN_TIMEOUT, async {
            while drainers.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(backlog = self.queue.backlog(), "Change-feed worker drain timed out");
            drainers.abort_all();
        }
        info!("Change-feed worker shut down");
        Ok(())
    }

    /// Queue `input` behind earlier changes to the same booking, starting a
    /// drain task when the booking has none.
    fn enqueue(&self, input: TriggerInput, drainers: &mut JoinSet<()>) {
        let key = input.booking_id.as_str().to_string();
        if !self.queue.push(&key, input) {
            debug!(booking_id = %key, "Change queued behind in-flight booking");
            return;
        }
        let worker = self.clone();
        drainers.spawn(async move { worker.drain(key).await });
    }

    async fn drain(&self, key: String) {
        // The semaphore is never closed; without a permit the queue still drains.
        let _permit = self.permits.acquire().await.ok();
        while let Some(input) = self.queue.next(&key) {
            self.process(input).await;
        }
    }

    /// Handle one change, retrying retryable failures.
    pub async fn process(&self, input: TriggerInput) -> TriggerOutcome {
        let mut attempt = 1;
        loop {
            let outcome = self.trigger.handle(&input).await;
            if !outcome.is_retryable() {
                debug!(booking_id = %input.booking_id, attempt, outcome = outcome.label(), "Change processed");
                return outcome;
            }
            if attempt >= self.max_attempts {
                error!(booking_id = %input.booking_id, attempt, "Giving up on change after retries");
                return outcome;
            }

            let delay = self.backoff(attempt);
            warn!(
                booking_id = %input.booking_id,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Retrying change"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}
