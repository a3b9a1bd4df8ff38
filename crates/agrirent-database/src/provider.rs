//! Document store selection from configuration.

use std::sync::Arc;

use tracing::info;

use agrirent_core::config::{DatabaseConfig, StoreBackend};
use agrirent_core::result::AppResult;
use agrirent_core::traits::document_store::DocumentStore;

use crate::memory::MemoryDocumentStore;
use crate::migration::run_migrations;
use crate::postgres::{PgDocumentStore, connect_pool};

/// Build the document store named by `database.provider`.
///
/// The postgres provider connects and applies pending migrations before
/// returning.
pub async fn connect_store(config: &DatabaseConfig) -> AppResult<Arc<dyn DocumentStore>> {
    match config.provider {
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            Ok(Arc::new(MemoryDocumentStore::new(config.change_buffer_size)))
        }
        StoreBackend::Postgres => {
            let pool = connect_pool(config).await?;
            run_migrations(&pool).await?;
            info!("Using PostgreSQL document store");
            Ok(Arc::new(PgDocumentStore::new(pool, config.change_buffer_size)))
        }
    }
}
