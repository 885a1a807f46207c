//! Write-side input for parts and the field rules that guard it.
//!
//! Raw input arrives as [`PartFields`] (every field optional, nothing checked yet).
//! It becomes a [`NewPart`] for inserts or a [`PartPatch`] for partial updates;
//! both conversions run the same per-field checks, so the constraints live in
//! exactly one place.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use partshop_core::{FieldViolation, PartId, Rule, ValidationError};

use crate::category::Category;
use crate::part::Part;

/// Unvalidated part fields as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartFields {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub description: Option<String>,
}

/// A fully validated part, ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPart {
    name: String,
    category: Category,
    price: f64,
    stock: i64,
    description: Option<String>,
}

/// A validated partial update. Absent fields are left unchanged by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl PartFields {
    /// Read part fields out of a JSON object, checking only the value types.
    ///
    /// `null` is treated the same as an absent key. Keys that are not part
    /// fields are ignored.
    pub fn from_json(vars: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut errors = ValidationError::default();
        let mut fields = PartFields::default();

        let present = |key: &str| vars.get(key).filter(|v| !v.is_null());

        if let Some(v) = present("name") {
            match v.as_str() {
                Some(s) => fields.name = Some(s.to_string()),
                None => errors.push(cast_failure("name", "String", v)),
            }
        }
        if let Some(v) = present("category") {
            match v.as_str() {
                Some(s) => fields.category = Some(s.to_string()),
                None => errors.push(cast_failure("category", "String", v)),
            }
        }
        if let Some(v) = present("price") {
            match v.as_f64() {
                Some(n) => fields.price = Some(n),
                None => errors.push(cast_failure("price", "Number", v)),
            }
        }
        if let Some(v) = present("stock") {
            match as_integer(v) {
                Some(n) => fields.stock = Some(n),
                None => errors.push(cast_failure("stock", "Integer", v)),
            }
        }
        if let Some(v) = present("description") {
            match v.as_str() {
                Some(s) => fields.description = Some(s.to_string()),
                None => errors.push(cast_failure("description", "String", v)),
            }
        }

        errors.into_result().map(|()| fields)
    }

    /// Validate for insertion: required fields must be present, `stock` defaults to 0.
    pub fn into_new_part(self) -> Result<NewPart, ValidationError> {
        let mut errors = ValidationError::default();

        let name = match self.name {
            Some(raw) => collect(&mut errors, check_name(&raw)),
            None => {
                errors.push(name_required());
                None
            }
        };
        let category = match self.category {
            Some(raw) => collect(&mut errors, check_category(&raw)),
            None => {
                errors.push(category_required());
                None
            }
        };
        let price = match self.price {
            Some(raw) => collect(&mut errors, check_price(raw)),
            None => {
                errors.push(FieldViolation::new("price", Rule::Required, "Please add a price"));
                None
            }
        };
        let stock = collect(&mut errors, check_stock(self.stock.unwrap_or(0)));
        let description = self.description.map(|d| trim_description(&d));

        match (name, category, price, stock) {
            (Some(name), Some(category), Some(price), Some(stock)) if errors.is_empty() => Ok(NewPart {
                name,
                category,
                price,
                stock,
                description,
            }),
            _ => Err(errors),
        }
    }

    /// Validate for a partial update: only the supplied fields are checked.
    pub fn into_patch(self) -> Result<PartPatch, ValidationError> {
        let mut errors = ValidationError::default();

        let patch = PartPatch {
            name: self.name.and_then(|raw| collect(&mut errors, check_name(&raw))),
            category: self.category.and_then(|raw| collect(&mut errors, check_category(&raw))),
            price: self.price.and_then(|raw| collect(&mut errors, check_price(raw))),
            stock: self.stock.and_then(|raw| collect(&mut errors, check_stock(raw))),
            description: self.description.map(|d| trim_description(&d)),
        };

        errors.into_result().map(|()| patch)
    }
}

impl NewPart {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Materialize the stored record once the store has assigned its identity.
    pub fn into_part(self, id: PartId, created_at: DateTime<Utc>) -> Part {
        Part {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            stock: self.stock,
            description: self.description,
            created_at,
        }
    }
}

impl PartPatch {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn stock(&self) -> Option<i64> {
        self.stock
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.description.is_none()
    }

    /// The patch as a JSON object holding only the supplied fields.
    pub fn to_document(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

fn collect<T>(errors: &mut ValidationError, checked: Result<T, FieldViolation>) -> Option<T> {
    match checked {
        Ok(v) => Some(v),
        Err(violation) => {
            errors.push(violation);
            None
        }
    }
}

fn name_required() -> FieldViolation {
    FieldViolation::new("name", Rule::Required, "Please add a name for the part")
}

fn check_name(raw: &str) -> Result<String, FieldViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(name_required());
    }
    Ok(trimmed.to_string())
}

fn category_required() -> FieldViolation {
    FieldViolation::new(
        "category",
        Rule::Required,
        "Please specify a category (e.g., CPU, GPU, RAM)",
    )
}

fn check_category(raw: &str) -> Result<Category, FieldViolation> {
    if raw.trim().is_empty() {
        return Err(category_required());
    }
    raw.parse()
}

fn check_price(raw: f64) -> Result<f64, FieldViolation> {
    if !raw.is_finite() {
        return Err(FieldViolation::new(
            "price",
            Rule::Type,
            format!("Cast to Number failed for value \"{raw}\" at path \"price\""),
        ));
    }
    if raw < 0.0 {
        return Err(FieldViolation::new("price", Rule::Minimum, "Price cannot be negative"));
    }
    Ok(raw)
}

fn check_stock(raw: i64) -> Result<i64, FieldViolation> {
    if raw < 0 {
        return Err(FieldViolation::new("stock", Rule::Minimum, "Stock cannot be negative"));
    }
    Ok(raw)
}

fn trim_description(raw: &str) -> String {
    raw.trim().to_string()
}

/// Integers, or floats with no fractional part (`10.0`).
fn as_integer(v: &Value) -> Option<i64> {
    if let Some(n) = v.as_i64() {
        return Some(n);
    }
    let f = v.as_f64()?;
    // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn cast_failure(field: &'static str, kind: &str, v: &Value) -> FieldViolation {
    FieldViolation::new(
        field,
        Rule::Type,
        format!("Cast to {kind} failed for value \"{v}\" at path \"{field}\""),
    )
}
