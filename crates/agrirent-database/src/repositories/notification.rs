//! Notification repository implementation.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use agrirent_core::error::AppError;
use agrirent_core::result::AppResult;
use agrirent_core::traits::document_store::DocumentStore;
use agrirent_core::types::{Document, NotificationId, UserId, collections};
use agrirent_entity::notification::{NewNotification, Notification};

/// Repository for in-app notification documents.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    store: Arc<dyn DocumentStore>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist a notification with a server-assigned timestamp.
    pub async fn create(&self, new: &NewNotification) -> AppResult<Notification> {
        let timestamp = Utc::now();
        let doc = new.to_document(timestamp);
        let id = self.store.add(collections::NOTIFICATIONS, doc).await?;
        Ok(Notification {
            id: NotificationId::new(id),
            user_id: new.user_id.clone(),
            title: new.title.clone(),
            message: new.message.clone(),
            timestamp,
            read: false,
            data: new.data.clone(),
        })
    }

    /// Notifications for a user, newest first.
    ///
    /// Documents that no longer decode are skipped with a warning.
    pub async fn list_for_user(&self, user_id: &UserId, limit: usize) -> AppResult<Vec<Notification>> {
        let rows = self
            .store
            .find_by_field(
                collections::NOTIFICATIONS,
                "userId",
                &user_id.as_str().into(),
                limit,
            )
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, doc)| match Notification::from_document(&id, &doc) {
                Ok(n) => Some(n),
                Err(e) => {
                    warn!(notification_id = %id, error = %e, "Skipping malformed notification");
                    None
                }
            })
            .collect())
    }

    /// Find a notification by id.
    pub async fn find(&self, id: &NotificationId) -> AppResult<Option<Notification>> {
        match self.store.get(collections::NOTIFICATIONS, id.as_str()).await? {
            Some(doc) => Notification::from_document(id.as_str(), &doc).map(Some),
            None => Ok(None),
        }
    }

    /// Mark a notification read on behalf of its recipient.
    pub async fn mark_read(&self, id: &NotificationId, user_id: &UserId) -> AppResult<Notification> {
        let mut notification = self
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
        if &notification.user_id != user_id {
            return Err(AppError::authorization(
                "Only the recipient can mark a notification read",
            ));
        }
        if !notification.read {
            let mut fields = Document::new();
            fields.insert("read".into(), true.into());
            self.store
                .update(collections::NOTIFICATIONS, id.as_str(), fields)
                .await?;
            notification.read = true;
        }
        Ok(notification)
    }
}
