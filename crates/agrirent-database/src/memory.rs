//! In-memory document store with a per-collection change feed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, trace};
use uuid::Uuid;

use agrirent_core::error::AppError;
use agrirent_core::result::AppResult;
use agrirent_core::traits::document_store::{ChangeStream, DocumentStore};
use agrirent_core::types::{Document, DocumentChange};

#[derive(Debug, Clone)]
struct StoredDocument {
    data: Document,
    /// Insertion order, used for newest-first listing.
    seq: u64,
}

/// Document store held entirely in process memory.
///
/// Each write publishes a [`DocumentChange`] while the collection is still
/// locked, so subscribers observe writes to one document in write order.
#[derive(Debug)]
pub struct MemoryDocumentStore {
    collections: DashMap<String, HashMap<String, StoredDocument>>,
    channels: DashMap<String, broadcast::Sender<DocumentChange>>,
    next_seq: AtomicU64,
    channel_capacity: usize,
}

impl MemoryDocumentStore {
    /// Create an empty store whose change channels buffer `channel_capacity` events.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            collections: DashMap::new(),
            channels: DashMap::new(),
            next_seq: AtomicU64::new(0),
            channel_capacity: channel_capacity.max(1),
        }
    }

    fn publish(&self, collection: &str, id: &str, before: Option<Document>, after: Option<Document>) {
        if let Some(tx) = self.channels.get(collection) {
            let change = DocumentChange {
                collection: collection.to_string(),
                id: id.to_string(),
                before,
                after,
            };
            // No receivers is fine: nobody is listening to this collection.
            let _ = tx.send(change);
        }
    }

    /// Create or overwrite; an overwrite keeps the original insertion order.
    fn write(&self, collection: &str, id: &str, data: Document) {
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        let before = match docs.get_mut(id) {
            Some(existing) => Some(std::mem::replace(&mut existing.data, data.clone())),
            None => {
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                docs.insert(
                    id.to_string(),
                    StoredDocument {
                        data: data.clone(),
                        seq,
                    },
                );
                None
            }
        };
        self.publish(collection, id, before, Some(data));
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).map(|d| d.data.clone())))
    }

    async fn set(&self, collection: &str, id: &str, document: Document) -> AppResult<()> {
        trace!(collection, id, "memory store set");
        self.write(collection, id, document);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> AppResult<()> {
        let mut docs = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| AppError::not_found(format!("{collection}/{id} does not exist")))?;
        let stored = docs
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("{collection}/{id} does not exist")))?;

        let before = stored.data.clone();
        for (key, value) in fields {
            stored.data.insert(key, value);
        }
        let after = stored.data.clone();
        self.publish(collection, id, Some(before), Some(after));
        Ok(())
    }

    async fn add(&self, collection: &str, document: Document) -> AppResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.write(collection, &id, document);
        debug!(collection, id = %id, "memory store add");
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        match docs.remove(id) {
            Some(removed) => {
                self.publish(collection, id, Some(removed.data), None);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &serde_json::Value,
        limit: usize,
    ) -> AppResult<Vec<(String, Document)>> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        let mut matches: Vec<(u64, String, Document)> = docs
            .iter()
            .filter(|(_, d)| d.data.get(field) == Some(value))
            .map(|(id, d)| (d.seq, id.clone(), d.data.clone()))
            .collect();
        matches.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(matches
            .into_iter()
            .take(limit)
            .map(|(_, id, data)| (id, data))
            .collect())
    }

    async fn subscribe(&self, collection: &str) -> AppResult<ChangeStream> {
        let tx = self
            .channels
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0);
        Ok(tx.subscribe())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_set_get_update() {
        let store = MemoryDocumentStore::default();
        store.set("bookings", "b1", doc(json!({"status": "pending"}))).await.unwrap();
        store
            .update("bookings", "b1", doc(json!({"hasNotifiedCreation": true})))
            .await
            .unwrap();
        let stored = store.get("bookings", "b1").await.unwrap().unwrap();
        assert_eq!(stored["status"], "pending");
        assert_eq!(stored["hasNotifiedCreation"], true);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryDocumentStore::default();
        let err = store.update("bookings", "nope", Document::new()).await.unwrap_err();
        assert_eq!(err.kind, agrirent_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_change_feed_reports_before_and_after() {
        let store = MemoryDocumentStore::default();
        let mut changes = store.subscribe("bookings").await.unwrap();

        store.set("bookings", "b1", doc(json!({"status": "pending"}))).await.unwrap();
        store.update("bookings", "b1", doc(json!({"status": "accepted"}))).await.unwrap();
        store.delete("bookings", "b1").await.unwrap();
        store.set("users", "u1", doc(json!({"name": "Alice"}))).await.unwrap();

        let created = changes.recv().await.unwrap();
        assert!(created.before.is_none());
        assert_eq!(created.after.unwrap()["status"], "pending");

        let updated = changes.recv().await.unwrap();
        assert_eq!(updated.before.unwrap()["status"], "pending");
        assert_eq!(updated.after.unwrap()["status"], "accepted");

        let deleted = changes.recv().await.unwrap();
        assert!(deleted.after.is_none());

        assert!(changes.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_find_by_field_newest_first() {
        let store = MemoryDocumentStore::default();
        let first = store.add("notifications", doc(json!({"userId": "O1", "n": 1}))).await.unwrap();
        store.add("notifications", doc(json!({"userId": "R1", "n": 2}))).await.unwrap();
        let third = store.add("notifications", doc(json!({"userId": "O1", "n": 3}))).await.unwrap();

        let found = store
            .find_by_field("notifications", "userId", &json!("O1"), 10)
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|(id, _)| id.clone()).collect();
        assert_eq!(ids, vec![third, first]);
    }
}
