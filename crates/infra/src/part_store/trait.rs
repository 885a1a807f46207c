use std::sync::Arc;

use thiserror::Error;

use partshop_core::PartId;
use partshop_parts::{NewPart, Part, PartPatch};

/// Part store operation error.
///
/// These are **infrastructure errors** (connectivity, query failures, corrupt
/// documents) as opposed to domain errors (validation, not found). The message
/// is carried as-is so callers can append it to their own context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartStoreError {
    /// The store could not be reached (pool closed, timeout, IO).
    #[error("{0}")]
    Connection(String),

    /// The store rejected or failed the operation.
    #[error("{0}")]
    Query(String),

    /// A stored document could not be encoded/decoded.
    #[error("{0}")]
    Decode(String),
}

/// Single-collection document store for parts.
///
/// Each method is one round-trip to the backing store. Implementations rely on
/// the store's own per-document atomicity; no locking or ordering is added on
/// top of it.
///
/// Missing records are reported as `Ok(None)`, never as an error, so that
/// callers can tell "absent" apart from "store failed".
#[async_trait::async_trait]
pub trait PartStore: Send + Sync {
    /// All parts, in natural storage order.
    async fn find_all(&self) -> Result<Vec<Part>, PartStoreError>;

    async fn find_by_id(&self, id: PartId) -> Result<Option<Part>, PartStoreError>;

    /// Persist a new part, assigning its `id` and `created_at`.
    async fn insert(&self, part: NewPart) -> Result<Part, PartStoreError>;

    /// Merge `patch` into the stored document and return the post-update record.
    async fn update_by_id(&self, id: PartId, patch: PartPatch) -> Result<Option<Part>, PartStoreError>;

    /// Remove the document and return it as it was immediately before removal.
    async fn delete_by_id(&self, id: PartId) -> Result<Option<Part>, PartStoreError>;
}

#[async_trait::async_trait]
impl<S> PartStore for Arc<S>
where
    S: PartStore + ?Sized,
{
    async fn find_all(&self) -> Result<Vec<Part>, PartStoreError> {
        (**self).find_all().await
    }

    async fn find_by_id(&self, id: PartId) -> Result<Option<Part>, PartStoreError> {
        (**self).find_by_id(id).await
    }

    async fn insert(&self, part: NewPart) -> Result<Part, PartStoreError> {
        (**self).insert(part).await
    }

    async fn update_by_id(&self, id: PartId, patch: PartPatch) -> Result<Option<Part>, PartStoreError> {
        (**self).update_by_id(id, patch).await
    }

    async fn delete_by_id(&self, id: PartId) -> Result<Option<Part>, PartStoreError> {
        (**self).delete_by_id(id).await
    }
}
