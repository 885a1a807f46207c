//! Part operation handlers (application-level resolution layer).
//!
//! Each handler maps one API operation onto exactly one `PartStore` call:
//!
//! ```text
//! raw input
//!   ↓
//! 1. Parse id / validate fields (domain rules, no IO)
//!   ↓
//! 2. One store call
//!   ↓
//! 3. Map "absent" to NotFound, store failures to Store
//! ```
//!
//! Validation failures never reach the store. Nothing is retried.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::instrument;

use partshop_core::{DomainError, PartId, ValidationError};
use partshop_parts::{Part, PartFields};

use crate::part_store::{PartStore, PartStoreError};

/// The operation a failure happened in; selects the message prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Add,
    Update,
    Remove,
}

impl Operation {
    pub fn prefix(&self) -> &'static str {
        match self {
            Operation::List => "Error fetching parts: ",
            Operation::Get => "Error fetching part: ",
            Operation::Add => "Error adding part: ",
            Operation::Update => "Error updating part: ",
            Operation::Remove => "Error removing part: ",
        }
    }
}

/// Handler failure, tagged by kind so callers can tell "record absent" from
/// "store unreachable".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PartError {
    /// Input failed a field rule; the store was not called.
    #[error("{}{}", .op.prefix(), .source)]
    Validation {
        op: Operation,
        source: ValidationError,
    },

    /// No record matches the id.
    #[error("{}Part not found", .op.prefix())]
    NotFound { op: Operation },

    /// The store call itself failed.
    #[error("{}{}", .op.prefix(), .source)]
    Store {
        op: Operation,
        source: PartStoreError,
    },
}

impl PartError {
    fn from_domain(op: Operation, err: DomainError) -> Self {
        match err {
            DomainError::Validation(source) => PartError::Validation { op, source },
            DomainError::NotFound => PartError::NotFound { op },
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            PartError::Validation { op, .. } | PartError::NotFound { op } | PartError::Store { op, .. } => *op,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PartError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PartError::Validation { .. })
    }
}

/// The five part operations over an explicitly passed store handle.
#[derive(Debug, Clone)]
pub struct PartService<S> {
    store: S,
}

impl<S> PartService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> PartService<S>
where
    S: PartStore,
{
    /// All parts, in natural storage order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Part>, PartError> {
        self.store
            .find_all()
            .await
            .map_err(|source| store_failure(Operation::List, source))
    }

    /// The part matching `id`, or `NotFound`.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Part, PartError> {
        let op = Operation::Get;
        let id = parse_id(op, id)?;
        match self.store.find_by_id(id).await {
            Ok(Some(part)) => Ok(part),
            Ok(None) => Err(not_found(op, id)),
            Err(source) => Err(store_failure(op, source)),
        }
    }

    /// Validate and insert a new part; returns the stored record.
    #[instrument(skip(self, fields))]
    pub async fn create(&self, fields: PartFields) -> Result<Part, PartError> {
        let op = Operation::Add;
        let new_part = fields.into_new_part().map_err(|e| invalid(op, e))?;
        let part = self
            .store
            .insert(new_part)
            .await
            .map_err(|source| store_failure(op, source))?;

        tracing::info!(id = %part.id, category = %part.category, "part added");
        Ok(part)
    }

    /// `create` over raw JSON variables; type mismatches are validation failures.
    #[instrument(skip(self, variables))]
    pub async fn create_from_json(&self, variables: &Map<String, Value>) -> Result<Part, PartError> {
        let fields = PartFields::from_json(variables).map_err(|e| invalid(Operation::Add, e))?;
        self.create(fields).await
    }

    /// `update` over raw JSON variables.
    ///
    /// A malformed id and mistyped fields are reported together in one
    /// validation failure.
    #[instrument(skip(self, variables))]
    pub async fn update_from_json(&self, id: &str, variables: &Map<String, Value>) -> Result<Part, PartError> {
        let op = Operation::Update;
        let mut errors = ValidationError::default();
        let parsed_id = match id.parse::<PartId>() {
            Ok(id) => Some(id),
            Err(DomainError::Validation(e)) => {
                errors.merge(e);
                None
            }
            Err(e) => return Err(PartError::from_domain(op, e)),
        };
        let fields = match PartFields::from_json(variables) {
            Ok(fields) => Some(fields),
            Err(e) => {
                errors.merge(e);
                None
            }
        };

        match (parsed_id, fields) {
            (Some(id), Some(fields)) => self.apply_update(id, fields).await,
            _ => Err(invalid(op, errors)),
        }
    }

    /// Validate the supplied fields and apply them as a partial update.
    ///
    /// An update with no fields still goes to the store and returns the record
    /// unchanged.
    #[instrument(skip(self, fields))]
    pub async fn update(&self, id: &str, fields: PartFields) -> Result<Part, PartError> {
        let id = parse_id(Operation::Update, id)?;
        self.apply_update(id, fields).await
    }

    async fn apply_update(&self, id: PartId, fields: PartFields) -> Result<Part, PartError> {
        let op = Operation::Update;
        let patch = fields.into_patch().map_err(|e| invalid(op, e))?;
        match self.store.update_by_id(id, patch).await {
            Ok(Some(part)) => Ok(part),
            Ok(None) => Err(not_found(op, id)),
            Err(source) => Err(store_failure(op, source)),
        }
    }

    /// Hard-delete the part; returns it as it was before removal.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Part, PartError> {
        let op = Operation::Remove;
        let id = parse_id(op, id)?;
        match self.store.delete_by_id(id).await {
            Ok(Some(part)) => {
                tracing::info!(id = %part.id, "part removed");
                Ok(part)
            }
            Ok(None) => Err(not_found(op, id)),
            Err(source) => Err(store_failure(op, source)),
        }
    }
}

fn parse_id(op: Operation, raw: &str) -> Result<PartId, PartError> {
    raw.parse::<PartId>().map_err(|e| {
        let err = PartError::from_domain(op, e);
        tracing::warn!(error = %err, "rejected malformed part id");
        err
    })
}

fn invalid(op: Operation, source: ValidationError) -> PartError {
    let err = PartError::Validation { op, source };
    tracing::warn!(error = %err, "part validation failed");
    err
}

fn not_found(op: Operation, id: PartId) -> PartError {
    tracing::warn!(%id, "part not found");
    PartError::from_domain(op, DomainError::not_found())
}

fn store_failure(op: Operation, source: PartStoreError) -> PartError {
    let err = PartError::Store { op, source };
    tracing::error!(error = %err, "part store call failed");
    err
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use partshop_core::Rule;
    use partshop_parts::{Category, NewPart, PartPatch};

    use super::*;
    use crate::part_store::InMemoryPartStore;

    /// Store double whose every call fails with the given message.
    struct FailingStore {
        message: &'static str,
        calls: AtomicUsize,
    }

    impl FailingStore {
        fn new(message: &'static str) -> Self {
            Self {
                message,
                calls: AtomicUsize::new(0),
            }
        }

        fn fail<T>(&self) -> Result<T, PartStoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(PartStoreError::Query(self.message.to_string()))
        }
    }

    #[async_trait::async_trait]
    impl PartStore for FailingStore {
        async fn find_all(&self) -> Result<Vec<Part>, PartStoreError> {
            self.fail()
        }

        async fn find_by_id(&self, _id: PartId) -> Result<Option<Part>, PartStoreError> {
            self.fail()
        }

        async fn insert(&self, _part: NewPart) -> Result<Part, PartStoreError> {
            self.fail()
        }

        async fn update_by_id(&self, _id: PartId, _patch: PartPatch) -> Result<Option<Part>, PartStoreError> {
            self.fail()
        }

        async fn delete_by_id(&self, _id: PartId) -> Result<Option<Part>, PartStoreError> {
            self.fail()
        }
    }

    fn service() -> PartService<Arc<InMemoryPartStore>> {
        PartService::new(Arc::new(InMemoryPartStore::new()))
    }

    fn fields(name: &str, category: &str, price: f64, stock: i64) -> PartFields {
        PartFields {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            price: Some(price),
            stock: Some(stock),
            description: None,
        }
    }

    fn test_processor() -> PartFields {
        PartFields {
            description: Some("A powerful test CPU".to_string()),
            ..fields("Test Processor", "CPU", 299.99, 10)
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_the_same_record() {
        let svc = service();
        let created = svc.create(test_processor()).await.unwrap();

        assert_eq!(created.name, "Test Processor");
        assert_eq!(created.category, Category::Cpu);
        assert_eq!(created.price, 299.99);
        assert_eq!(created.stock, 10);
        assert_eq!(created.description.as_deref(), Some("A powerful test CPU"));

        let fetched = svc.get(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn created_ids_are_fresh() {
        let svc = service();
        let mut ids = std::collections::HashSet::new();
        for i in 0..20 {
            let part = svc.create(fields(&format!("Fan {i}"), "Cooling", 9.5, i)).await.unwrap();
            assert!(!part.id.to_string().is_empty());
            assert!(ids.insert(part.id));
        }
        assert_eq!(svc.list().await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let svc = service();
        let gpu = svc.create(fields("RTX 3080", "GPU", 699.0, 5)).await.unwrap();

        let patch = PartFields {
            name: Some("Updated GPU".to_string()),
            price: Some(450.99),
            ..PartFields::default()
        };
        let updated = svc.update(&gpu.id.to_string(), patch).await.unwrap();

        assert_eq!(updated.name, "Updated GPU");
        assert_eq!(updated.price, 450.99);
        assert_eq!(updated.category, Category::Gpu);
        assert_eq!(updated.stock, 5);
        assert_eq!(updated.created_at, gpu.created_at);
        assert_eq!(svc.get(&gpu.id.to_string()).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_with_no_fields_returns_unchanged_record() {
        let svc = service();
        let psu = svc.create(fields("850W Gold", "Power Supply", 129.0, 7)).await.unwrap();

        let same = svc.update(&psu.id.to_string(), PartFields::default()).await.unwrap();
        assert_eq!(same, psu);
    }

    #[tokio::test]
    async fn delete_returns_pre_removal_record_then_get_is_not_found() {
        let svc = service();
        let ram = svc.create(fields("32GB DDR5", "RAM", 110.0, 30)).await.unwrap();
        let id = ram.id.to_string();

        let removed = svc.delete(&id).await.unwrap();
        assert_eq!(removed, ram);

        let err = svc.get(&id).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Part not found"));
        assert_eq!(err.to_string(), "Error fetching part: Part not found");
    }

    #[tokio::test]
    async fn never_issued_ids_are_not_found_for_every_id_operation() {
        let svc = service();
        let id = PartId::new().to_string();

        let get = svc.get(&id).await.unwrap_err();
        let update = svc.update(&id, PartFields::default()).await.unwrap_err();
        let delete = svc.delete(&id).await.unwrap_err();

        assert!(get.is_not_found());
        assert!(update.is_not_found());
        assert!(delete.is_not_found());
        assert_eq!(update.to_string(), "Error updating part: Part not found");
        assert_eq!(delete.to_string(), "Error removing part: Part not found");
    }

    #[tokio::test]
    async fn invalid_category_fails_validation_without_writing() {
        let svc = service();
        let err = svc.create(fields("Monitor", "Display", 199.0, 1)).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.operation(), Operation::Add);
        assert!(err.to_string().starts_with("Error adding part: Part validation failed: category"));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn negative_price_or_stock_fails_validation_without_writing() {
        let svc = service();
        assert!(svc.create(fields("SSD", "Storage", -1.0, 1)).await.unwrap_err().is_validation());
        assert!(svc.create(fields("SSD", "Storage", 1.0, -1)).await.unwrap_err().is_validation());
        assert!(svc.store().is_empty());
    }

    #[tokio::test]
    async fn update_rechecks_invariants_of_supplied_fields() {
        let svc = service();
        let case = svc.create(fields("Mid Tower", "Case", 79.0, 3)).await.unwrap();

        let err = svc
            .update(
                &case.id.to_string(),
                PartFields {
                    stock: Some(-2),
                    ..PartFields::default()
                },
            )
            .await
            .unwrap_err();

        match &err {
            PartError::Validation { op, source } => {
                assert_eq!(*op, Operation::Update);
                assert_eq!(source.field("stock").unwrap().rule, Rule::Minimum);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(svc.get(&case.id.to_string()).await.unwrap().stock, 3);
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_before_the_store() {
        let store = Arc::new(FailingStore::new("unreachable"));
        let svc = PartService::new(store.clone());

        let err = svc.get("some-id").await.unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Error fetching part: Part validation failed: id"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn mistyped_json_fields_fail_validation_before_the_store() {
        let store = Arc::new(FailingStore::new("unreachable"));
        let svc = PartService::new(store.clone());
        let vars = serde_json::json!({"name": "SSD", "category": "Storage", "price": "free"});

        let err = svc.create_from_json(vars.as_object().unwrap()).await.unwrap_err();
        match &err {
            PartError::Validation { op, source } => {
                assert_eq!(*op, Operation::Add);
                assert_eq!(source.field("price").unwrap().rule, Rule::Type);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_reports_malformed_id_and_mistyped_fields_together() {
        let store = Arc::new(FailingStore::new("unreachable"));
        let svc = PartService::new(store.clone());
        let vars = serde_json::json!({"stock": "many", "name": 7});

        let err = svc
            .update_from_json("not-an-id", vars.as_object().unwrap())
            .await
            .unwrap_err();
        let PartError::Validation { op, source } = &err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(*op, Operation::Update);
        assert_eq!(source.field("id").unwrap().rule, Rule::Type);
        assert_eq!(source.field("stock").unwrap().rule, Rule::Type);
        assert_eq!(source.field("name").unwrap().rule, Rule::Type);
        assert!(err.to_string().starts_with("Error updating part: Part validation failed: id"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn json_update_applies_supplied_fields() {
        let svc = service();
        let gpu = svc.create(fields("RTX 3080", "GPU", 699.0, 5)).await.unwrap();
        let vars = serde_json::json!({"price": 650.0, "description": null});

        let updated = svc
            .update_from_json(&gpu.id.to_string(), vars.as_object().unwrap())
            .await
            .unwrap();
        assert_eq!(updated.price, 650.0);
        assert_eq!(updated.name, "RTX 3080");
        assert_eq!(updated.stock, 5);
    }

    #[tokio::test]
    async fn store_failures_are_wrapped_with_operation_prefix() {
        let id = PartId::new().to_string();

        let svc = PartService::new(FailingStore::new("Database error"));
        assert_eq!(
            svc.list().await.unwrap_err().to_string(),
            "Error fetching parts: Database error"
        );
        assert_eq!(
            svc.get(&id).await.unwrap_err().to_string(),
            "Error fetching part: Database error"
        );

        let svc = PartService::new(FailingStore::new("Save error"));
        assert_eq!(
            svc.create(test_processor()).await.unwrap_err().to_string(),
            "Error adding part: Save error"
        );

        let svc = PartService::new(FailingStore::new("Update error"));
        assert_eq!(
            svc.update(&id, PartFields::default()).await.unwrap_err().to_string(),
            "Error updating part: Update error"
        );

        let svc = PartService::new(FailingStore::new("Delete error"));
        let err = svc.delete(&id).await.unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Error removing part: Delete error");
    }

    #[tokio::test]
    async fn each_operation_makes_exactly_one_store_call() {
        let store = Arc::new(FailingStore::new("boom"));
        let svc = PartService::new(store.clone());
        let id = PartId::new().to_string();

        let _ = svc.list().await;
        let _ = svc.get(&id).await;
        let _ = svc.create(test_processor()).await;
        let _ = svc.update(&id, PartFields::default()).await;
        let _ = svc.delete(&id).await;

        assert_eq!(store.calls.load(Ordering::SeqCst), 5);
    }
}
