//! Domain error model.

use serde::Serialize;
use thiserror::Error;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing records). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// One or more fields failed validation.
    #[error(transparent)]
    Validation(ValidationError),

    /// A requested record was not found.
    #[error("Part not found")]
    NotFound,
}

impl DomainError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<ValidationError> for DomainError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// The constraint a field violated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    Required,
    Type,
    Minimum,
    Enumeration,
}

impl core::fmt::Display for Rule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Rule::Required => "required",
            Rule::Type => "type",
            Rule::Minimum => "minimum",
            Rule::Enumeration => "enum",
        };
        f.write_str(s)
    }
}

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: Rule,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field,
            rule,
            message: message.into(),
        }
    }
}

/// All violations found while validating one write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Append every violation of `other`, keeping order.
    pub fn merge(&mut self, other: ValidationError) {
        self.violations.extend(other.violations);
    }

    /// Returns the first violation for `field`, if any.
    pub fn field(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }

    /// `Ok(())` when nothing was collected, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Part validation failed: ")?;
        for (idx, v) in self.violations.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_violation() {
        let mut err = ValidationError::default();
        err.push(FieldViolation::new("price", Rule::Minimum, "Price cannot be negative"));
        err.push(FieldViolation::new("stock", Rule::Minimum, "Stock cannot be negative"));

        assert_eq!(
            err.to_string(),
            "Part validation failed: price: Price cannot be negative, stock: Stock cannot be negative"
        );
        assert_eq!(err.field("stock").map(|v| v.rule), Some(Rule::Minimum));
        assert!(err.field("name").is_none());
    }

    #[test]
    fn empty_collector_is_ok() {
        assert!(ValidationError::default().into_result().is_ok());
    }

    #[test]
    fn not_found_message() {
        assert_eq!(DomainError::not_found().to_string(), "Part not found");
        assert!(DomainError::not_found().is_not_found());
    }

    #[test]
    fn merge_keeps_violation_order() {
        let mut err = ValidationError::single(FieldViolation::new("id", Rule::Type, "bad id"));
        err.merge(ValidationError::single(FieldViolation::new("price", Rule::Type, "bad price")));
        let fields: Vec<_> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, ["id", "price"]);
    }
}
