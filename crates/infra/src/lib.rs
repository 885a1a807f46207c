//! Infrastructure layer: document store adapters and the operation handlers
//! that sit on top of them.

pub mod db;
pub mod part_service;
pub mod part_store;

pub use part_service::{Operation, PartError, PartService};
pub use part_store::{InMemoryPartStore, PartStore, PartStoreError, PostgresPartStore};
