//! Booking repository implementation.

use std::sync::Arc;

use agrirent_core::error::AppError;
use agrirent_core::result::AppResult;
use agrirent_core::traits::document_store::DocumentStore;
use agrirent_core::types::{BookingId, Document, collections};
use agrirent_entity::booking::{BookingSnapshot, BookingStatus, NotificationFlag};

/// Repository for booking documents.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    store: Arc<dyn DocumentStore>,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Read the current snapshot of a booking.
    pub async fn find_snapshot(&self, id: &BookingId) -> AppResult<Option<BookingSnapshot>> {
        let Some(doc) = self.store.get(collections::BOOKINGS, id.as_str()).await? else {
            return Ok(None);
        };
        BookingSnapshot::from_document(&doc)
            .map(Some)
            .map_err(|e| AppError::validation(format!("Booking {id} is malformed: {e}")))
    }

    /// Insert a new booking and return its generated id.
    pub async fn create(&self, snapshot: &BookingSnapshot) -> AppResult<BookingId> {
        let id = self
            .store
            .add(collections::BOOKINGS, snapshot.to_document())
            .await?;
        Ok(BookingId::new(id))
    }

    /// Write only the `status` field.
    pub async fn update_status(&self, id: &BookingId, status: BookingStatus) -> AppResult<()> {
        let mut fields = Document::new();
        fields.insert("status".into(), status.as_str().into());
        self.store
            .update(collections::BOOKINGS, id.as_str(), fields)
            .await
    }

    /// Set an idempotency flag. Flags are never cleared.
    pub async fn mark_flag(&self, id: &BookingId, flag: NotificationFlag) -> AppResult<()> {
        let mut fields = Document::new();
        fields.insert(flag.field().into(), true.into());
        self.store
            .update(collections::BOOKINGS, id.as_str(), fields)
            .await
    }
}
