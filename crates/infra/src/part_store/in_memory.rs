use std::sync::RwLock;

use chrono::Utc;

use partshop_core::{Entity, PartId};
use partshop_parts::{NewPart, Part, PartPatch};

use super::r#trait::{PartStore, PartStoreError};

/// In-memory part collection.
///
/// Intended for tests/dev. Keeps insertion order; lookups are linear.
#[derive(Debug, Default)]
pub struct InMemoryPartStore {
    parts: RwLock<Vec<Part>>,
}

impl InMemoryPartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parts.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> PartStoreError {
    PartStoreError::Query("in-memory part store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl PartStore for InMemoryPartStore {
    async fn find_all(&self) -> Result<Vec<Part>, PartStoreError> {
        let parts = self.parts.read().map_err(|_| poisoned())?;
        Ok(parts.clone())
    }

    async fn find_by_id(&self, id: PartId) -> Result<Option<Part>, PartStoreError> {
        let parts = self.parts.read().map_err(|_| poisoned())?;
        Ok(parts.iter().find(|p| p.id() == &id).cloned())
    }

    async fn insert(&self, part: NewPart) -> Result<Part, PartStoreError> {
        let stored = part.into_part(PartId::new(), Utc::now());
        let mut parts = self.parts.write().map_err(|_| poisoned())?;
        parts.push(stored.clone());
        Ok(stored)
    }

    async fn update_by_id(&self, id: PartId, patch: PartPatch) -> Result<Option<Part>, PartStoreError> {
        let mut parts = self.parts.write().map_err(|_| poisoned())?;
        Ok(parts.iter_mut().find(|p| p.id() == &id).map(|p| {
            p.apply(&patch);
            p.clone()
        }))
    }

    async fn delete_by_id(&self, id: PartId) -> Result<Option<Part>, PartStoreError> {
        let mut parts = self.parts.write().map_err(|_| poisoned())?;
        Ok(parts
            .iter()
            .position(|p| p.id() == &id)
            .map(|idx| parts.remove(idx)))
    }
}
