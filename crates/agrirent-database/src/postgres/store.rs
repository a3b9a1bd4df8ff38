//! Documents stored as JSONB rows, with a `LISTEN/NOTIFY` change feed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use sqlx::types::Json;
use tokio::sync::{OnceCell, broadcast};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use agrirent_core::error::{AppError, ErrorKind};
use agrirent_core::result::AppResult;
use agrirent_core::traits::document_store::{ChangeStream, DocumentStore};
use agrirent_core::types::{Document, DocumentChange};

/// Channel the `documents_change` trigger publishes on.
const CHANGE_CHANNEL: &str = "document_changes";

type Channels = Arc<DashMap<String, broadcast::Sender<DocumentChange>>>;

/// Document store over the `documents` table.
///
/// The change feed is started on the first `subscribe` call. Notifications
/// carry both snapshots, so very large documents (over the 8000-byte
/// `pg_notify` payload limit) cannot be written while a trigger is attached.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    channels: Channels,
    listener: Arc<OnceCell<()>>,
    channel_capacity: usize,
}

fn db_error(context: &str, e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::Database, format!("{context}: {e}"), e)
}

impl PgDocumentStore {
    /// Create a store over an already migrated pool.
    pub fn new(pool: PgPool, channel_capacity: usize) -> Self {
        Self {
            pool,
            channels: Arc::new(DashMap::new()),
            listener: Arc::new(OnceCell::new()),
            channel_capacity: channel_capacity.max(1),
        }
    }

    async fn start_listener(&self) -> AppResult<()> {
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(|e| db_error("Failed to open change listener", e))?;
        listener
            .listen(CHANGE_CHANNEL)
            .await
            .map_err(|e| db_error("Failed to LISTEN for document changes", e))?;

        let channels = Arc::clone(&self.channels);
        tokio::spawn(async move {
            info!(channel = CHANGE_CHANNEL, "Document change listener started");
            loop {
                match listener.recv().await {
                    Ok(notification) => forward(&channels, notification.payload()),
                    Err(e) => {
                        error!(error = %e, "Document change listener failed, reconnecting");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });
        Ok(())
    }
}

fn forward(channels: &Channels, payload: &str) {
    let change: DocumentChange = match serde_json::from_str(payload) {
        Ok(change) => change,
        Err(e) => {
            warn!(error = %e, "Discarding malformed document change payload");
            return;
        }
    };
    if let Some(tx) = channels.get(&change.collection) {
        debug!(collection = %change.collection, id = %change.id, "Forwarding document change");
        let _ = tx.send(change);
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let row: Option<Json<Document>> =
            sqlx::query_scalar("SELECT data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to read document", e))?;
        Ok(row.map(|Json(doc)| doc))
    }

    async fn set(&self, collection: &str, id: &str, document: Document) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&document))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to write document", e))?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE documents SET data = data || $3, updated_at = NOW() \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&fields))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update document", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("{collection}/{id} does not exist")));
        }
        Ok(())
    }

    async fn add(&self, collection: &str, document: Document) -> AppResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(&document))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to insert document", e))?;
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete document", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &serde_json::Value,
        limit: usize,
    ) -> AppResult<Vec<(String, Document)>> {
        let rows: Vec<(String, Json<Document>)> = sqlx::query_as(
            "SELECT id, data FROM documents WHERE collection = $1 AND data -> $2 = $3 \
             ORDER BY seq DESC LIMIT $4",
        )
        .bind(collection)
        .bind(field)
        .bind(Json(value))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to query documents", e))?;

        Ok(rows.into_iter().map(|(id, Json(doc))| (id, doc)).collect())
    }

    async fn subscribe(&self, collection: &str) -> AppResult<ChangeStream> {
        self.listener
            .get_or_try_init(|| self.start_listener())
            .await?;
        let tx = self
            .channels
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0);
        Ok(tx.subscribe())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| db_error("Document store health check failed", e))
    }
}
