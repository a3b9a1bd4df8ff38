//! Push token repository implementation.

use std::sync::Arc;

use chrono::Utc;

use agrirent_core::result::AppResult;
use agrirent_core::traits::document_store::DocumentStore;
use agrirent_core::types::{UserId, collections};
use agrirent_entity::push_token::PushTokenRecord;

/// Repository for push token records, one document per user.
#[derive(Debug, Clone)]
pub struct PushTokenRepository {
    store: Arc<dyn DocumentStore>,
}

impl PushTokenRepository {
    /// Create a new push token repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Replace the user's token record.
    pub async fn upsert(&self, user_id: &UserId, token: &str) -> AppResult<PushTokenRecord> {
        let timestamp = Utc::now();
        self.store
            .set(
                collections::PUSH_TOKENS,
                user_id.as_str(),
                PushTokenRecord::document(token, timestamp),
            )
            .await?;
        Ok(PushTokenRecord {
            user_id: user_id.clone(),
            token: token.to_string(),
            timestamp: Some(timestamp),
        })
    }

    /// The user's current token record, if any.
    pub async fn find(&self, user_id: &UserId) -> AppResult<Option<PushTokenRecord>> {
        match self.store.get(collections::PUSH_TOKENS, user_id.as_str()).await? {
            Some(doc) => PushTokenRecord::from_document(user_id, &doc).map(Some),
            None => Ok(None),
        }
    }

    /// Remove the record if it still holds `token`.
    ///
    /// A token registered after the stale one was observed is kept.
    pub async fn delete_if_token(&self, user_id: &UserId, token: &str) -> AppResult<bool> {
        match self.find(user_id).await? {
            Some(record) if record.token == token => {
                self.store
                    .delete(collections::PUSH_TOKENS, user_id.as_str())
                    .await
            }
            _ => Ok(false),
        }
    }
}
