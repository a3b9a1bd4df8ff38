//! Equipment lookups.

use std::sync::Arc;

use agrirent_core::result::AppResult;
use agrirent_core::traits::document_store::DocumentStore;
use agrirent_core::types::{EquipmentId, collections};
use agrirent_entity::equipment::Equipment;

/// Read-only access to equipment records.
#[derive(Debug, Clone)]
pub struct EquipmentRepository {
    store: Arc<dyn DocumentStore>,
}

impl EquipmentRepository {
    /// Create a new equipment repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find equipment by id.
    pub async fn find(&self, id: &EquipmentId) -> AppResult<Option<Equipment>> {
        Ok(self
            .store
            .get(collections::EQUIPMENT, id.as_str())
            .await?
            .map(|doc| Equipment::from_document(id, &doc)))
    }
}
