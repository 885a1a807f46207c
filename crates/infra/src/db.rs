//! Database connection pool wiring.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::part_store::PartStoreError;

/// Open a Postgres pool and verify the store is reachable.
///
/// Fails with `PartStoreError::Connection` when no connection can be made; the
/// caller decides whether that is fatal.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, PartStoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(|e| PartStoreError::Connection(e.to_string()))?;

    tracing::info!(max_connections, "successfully connected to Postgres");
    Ok(pool)
}
