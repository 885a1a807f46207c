//! Part document store boundary.
//!
//! This module defines the persistence collaborator for parts: one named
//! collection with find/insert/update/delete by id, with an in-memory backend
//! for tests/dev and a Postgres (JSONB) backend for production.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryPartStore;
pub use postgres::PostgresPartStore;
pub use r#trait::{PartStore, PartStoreError};
