//! The signed-in user's notification inbox.

use agrirent_core::result::AppResult;
use agrirent_core::types::{NotificationId, UserId};
use agrirent_database::repositories::NotificationRepository;
use agrirent_entity::notification::Notification;

/// Page size when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
}

impl NotificationService {
    pub fn new(notifications: NotificationRepository) -> Self {
        Self { notifications }
    }

    /// The user's notifications, newest first.
    pub async fn list(&self, user: &UserId, limit: Option<usize>) -> AppResult<Vec<Notification>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        self.notifications.list_for_user(user, limit).await
    }

    /// Mark one of the user's notifications read.
    pub async fn mark_read(&self, user: &UserId, id: &NotificationId) -> AppResult<Notification> {
        self.notifications.mark_read(id, user).await
    }
}
