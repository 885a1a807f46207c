//! Postgres-backed part collection.
//!
//! Parts are stored as JSONB documents in a single `parts` table, keyed by id.
//! Each operation is one statement, so it inherits Postgres' single-row
//! atomicity and nothing else.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PartStoreError |
//! |------------|----------------|
//! | PoolTimedOut / PoolClosed / Io / Tls | `Connection` |
//! | Database (any code) | `Query` |
//! | ColumnDecode / Decode / invalid document shape | `Decode` |
//! | Other | `Query` |

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use partshop_core::PartId;
use partshop_parts::{NewPart, Part, PartPatch};

use super::r#trait::{PartStore, PartStoreError};

/// Postgres-backed part store.
///
/// ## Thread Safety
///
/// Uses SQLx connection pool which is thread-safe (Arc + Send + Sync).
#[derive(Debug, Clone)]
pub struct PostgresPartStore {
    pool: Arc<PgPool>,
}

impl PostgresPartStore {
    /// Create a new PostgresPartStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `parts` collection if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_collection(&self) -> Result<(), PartStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS parts (
                id UUID PRIMARY KEY,
                document JSONB NOT NULL,
                inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_collection", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PartStore for PostgresPartStore {
    #[instrument(skip(self), err)]
    async fn find_all(&self) -> Result<Vec<Part>, PartStoreError> {
        let rows = sqlx::query("SELECT document FROM parts ORDER BY inserted_at ASC, id ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(decode_row).collect()
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: PartId) -> Result<Option<Part>, PartStoreError> {
        let row = sqlx::query("SELECT document FROM parts WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(decode_row).transpose()
    }

    #[instrument(skip(self, part), err)]
    async fn insert(&self, part: NewPart) -> Result<Part, PartStoreError> {
        let stored = part.into_part(PartId::new(), Utc::now());
        let document = serde_json::to_value(&stored)
            .map_err(|e| PartStoreError::Decode(format!("part serialization failed: {e}")))?;

        sqlx::query("INSERT INTO parts (id, document) VALUES ($1, $2)")
            .bind(stored.id.as_uuid())
            .bind(&document)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(stored)
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    async fn update_by_id(&self, id: PartId, patch: PartPatch) -> Result<Option<Part>, PartStoreError> {
        // `||` merges top-level keys, so fields absent from the patch keep their value.
        let row = sqlx::query(
            r#"
            UPDATE parts
            SET document = document || $2
            WHERE id = $1
            RETURNING document
            "#,
        )
        .bind(id.as_uuid())
        .bind(patch.to_document())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_by_id", e))?;

        row.as_ref().map(decode_row).transpose()
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete_by_id(&self, id: PartId) -> Result<Option<Part>, PartStoreError> {
        let row = sqlx::query("DELETE FROM parts WHERE id = $1 RETURNING document")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        row.as_ref().map(decode_row).transpose()
    }
}

fn decode_row(row: &PgRow) -> Result<Part, PartStoreError> {
    let document: JsonValue = row
        .try_get("document")
        .map_err(|e| PartStoreError::Decode(format!("failed to read part document: {e}")))?;
    serde_json::from_value(document)
        .map_err(|e| PartStoreError::Decode(format!("failed to deserialize part document: {e}")))
}

/// Map SQLx errors to PartStoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> PartStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            PartStoreError::Query(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            PartStoreError::Connection(format!("connection pool unavailable in {}: {}", operation, err))
        }
        sqlx::Error::Io(e) => PartStoreError::Connection(format!("io error in {}: {}", operation, e)),
        sqlx::Error::Tls(e) => PartStoreError::Connection(format!("tls error in {}: {}", operation, e)),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            PartStoreError::Decode(format!("decode error in {}: {}", operation, err))
        }
        _ => PartStoreError::Query(format!("sqlx error in {}: {}", operation, err)),
    }
}
