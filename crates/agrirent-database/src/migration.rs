//! Schema migrations for the PostgreSQL document store.

use sqlx::PgPool;
use tracing::info;

use agrirent_core::error::{AppError, ErrorKind};

/// Apply pending migrations (the `documents` table and its change trigger).
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run document store migrations: {e}"),
                e,
            )
        })?;

    info!("Document store schema is up to date");
    Ok(())
}
