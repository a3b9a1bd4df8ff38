//! The push relay seam.

use async_trait::async_trait;

use crate::error::PushError;
use crate::message::{PushMessage, PushTicket};

/// Anything that accepts a batch of push messages.
///
/// On success the returned tickets line up with `messages` by index.
#[async_trait]
pub trait PushRelay: Send + Sync + std::fmt::Debug + 'static {
    async fn send(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError>;
}
