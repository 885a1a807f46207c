use std::sync::Arc;

use partshop_infra::{
    InMemoryPartStore, PartService, PartStore, PartStoreError, PostgresPartStore, db,
};

use crate::config::AppConfig;

/// Shared, long-lived handles used by every request.
///
/// The store is the only shared state; it does its own synchronization.
#[derive(Clone)]
pub struct AppServices {
    pub parts: PartService<Arc<dyn PartStore>>,
}

impl AppServices {
    pub fn new(store: Arc<dyn PartStore>) -> Self {
        Self {
            parts: PartService::new(store),
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryPartStore::new()))
    }

    /// Postgres wiring: connect, make sure the collection exists, then hand out the store.
    pub async fn connect(config: &AppConfig) -> Result<Self, PartStoreError> {
        let pool = db::connect(&config.database_url, config.max_connections).await?;
        let store = PostgresPartStore::new(pool);
        store.ensure_collection().await?;
        Ok(Self::new(Arc::new(store)))
    }
}
