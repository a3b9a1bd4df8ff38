//! User profile lookups.

use std::sync::Arc;

use agrirent_core::result::AppResult;
use agrirent_core::traits::document_store::DocumentStore;
use agrirent_core::types::{UserId, collections};
use agrirent_entity::user::UserProfile;

/// Read-only access to user profiles.
#[derive(Debug, Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find a user profile by id.
    pub async fn find(&self, id: &UserId) -> AppResult<Option<UserProfile>> {
        Ok(self
            .store
            .get(collections::USERS, id.as_str())
            .await?
            .map(|doc| UserProfile::from_document(id, &doc)))
    }
}
