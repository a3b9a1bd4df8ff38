//! Document store trait: the key-document database the subsystem sits on.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::result::AppResult;
use crate::types::document::{Document, DocumentChange};

/// Receiver side of a store's change feed.
pub type ChangeStream = broadcast::Receiver<DocumentChange>;

/// A collection/document store with snapshot reads, single-document
/// writes, and an optional change feed.
///
/// Writes never span documents; every read-modify-write the subsystem
/// performs touches exactly one document.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Read a document snapshot.
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    /// Create or fully overwrite a document.
    async fn set(&self, collection: &str, id: &str, document: Document) -> AppResult<()>;

    /// Merge fields into an existing document.
    ///
    /// Fails with `NotFound` when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Document) -> AppResult<()>;

    /// Insert a document under a generated id and return that id.
    async fn add(&self, collection: &str, document: Document) -> AppResult<String>;

    /// Delete a document. Returns `true` if it existed.
    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool>;

    /// Documents whose top-level `field` equals `value`, newest first by
    /// insertion, at most `limit` entries.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &serde_json::Value,
        limit: usize,
    ) -> AppResult<Vec<(String, Document)>>;

    /// Subscribe to writes on `collection`.
    async fn subscribe(&self, collection: &str) -> AppResult<ChangeStream>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
