//! Pool setup for the PostgreSQL document store.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use agrirent_core::config::DatabaseConfig;
use agrirent_core::error::{AppError, ErrorKind};
use agrirent_core::result::AppResult;

/// The change listener holds one connection for the life of the process.
const LISTENER_CONNECTIONS: u32 = 1;

/// Open the pool behind [`PgDocumentStore`](super::PgDocumentStore).
///
/// `max_connections` is raised when needed so document reads and writes
/// still get a connection while the change listener holds its own.
pub async fn connect_pool(config: &DatabaseConfig) -> AppResult<PgPool> {
    if config.url.trim().is_empty() {
        return Err(AppError::configuration(
            "database.url is required for the postgres provider",
        ));
    }

    let max_connections = config.max_connections.max(LISTENER_CONNECTIONS + 1);
    let min_connections = config.min_connections.min(max_connections);
    info!(
        url = %redact_url(&config.url),
        max_connections,
        min_connections,
        "Opening document store pool"
    );

    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Document store unreachable: {e}"),
                e,
            )
        })
}

/// Replace the password in a connection URL with `****`.
fn redact_url(url: &str) -> String {
    let Some(at) = url.rfind('@') else {
        return url.to_string();
    };
    let userinfo_start = url.find("://").map_or(0, |p| p + 3);
    match url[userinfo_start..at].find(':') {
        Some(colon) => format!("{}:****{}", &url[..userinfo_start + colon], &url[at..]),
        None => url.to_string(),
    }
}
