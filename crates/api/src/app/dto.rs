use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use partshop_core::FieldViolation;

// -------------------------
// Request DTOs
// -------------------------

/// Wire envelope: `{"operation": "addPart", "variables": {...}}`.
#[derive(Debug, Deserialize)]
pub struct OperationRequest {
    pub operation: String,
    #[serde(default)]
    pub variables: Map<String, Value>,
}

/// A request resolved to one of the five part operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PartOperation {
    Parts,
    Part { id: String },
    AddPart { variables: Map<String, Value> },
    UpdatePart { id: String, variables: Map<String, Value> },
    RemovePart { id: String },
}

impl PartOperation {
    /// Operation name, also used as the key under `data` in the response.
    pub fn name(&self) -> &'static str {
        match self {
            PartOperation::Parts => "parts",
            PartOperation::Part { .. } => "part",
            PartOperation::AddPart { .. } => "addPart",
            PartOperation::UpdatePart { .. } => "updatePart",
            PartOperation::RemovePart { .. } => "removePart",
        }
    }
}

impl TryFrom<OperationRequest> for PartOperation {
    type Error = String;

    fn try_from(req: OperationRequest) -> Result<Self, Self::Error> {
        let mut variables = req.variables;
        match req.operation.as_str() {
            "parts" => Ok(PartOperation::Parts),
            "part" => Ok(PartOperation::Part {
                id: required_id(&variables)?,
            }),
            "addPart" => Ok(PartOperation::AddPart { variables }),
            "updatePart" => {
                let id = required_id(&variables)?;
                variables.remove("id");
                Ok(PartOperation::UpdatePart { id, variables })
            }
            "removePart" => Ok(PartOperation::RemovePart {
                id: required_id(&variables)?,
            }),
            other => Err(format!("Unknown operation \"{other}\"")),
        }
    }
}

fn required_id(variables: &Map<String, Value>) -> Result<String, String> {
    match variables.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Null) | None => Err("Variable \"id\" of required type \"ID!\" was not provided".to_string()),
        Some(other) => Err(format!("Variable \"id\" got invalid value {other}; ID cannot represent this value")),
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// Response body: `data` always carries the operation key; `errors` only on failure.
#[derive(Debug, Serialize)]
pub struct OperationResponse<T> {
    pub data: BTreeMap<&'static str, Option<T>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorEntry>,
}

impl<T> OperationResponse<T> {
    pub fn ok(name: &'static str, value: T) -> Self {
        Self {
            data: BTreeMap::from([(name, Some(value))]),
            errors: Vec::new(),
        }
    }

    pub fn failed(name: &'static str, error: ErrorEntry) -> Self {
        Self {
            data: BTreeMap::from([(name, None)]),
            errors: vec![error],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEntry {
    pub message: String,
    pub extensions: ErrorExtensions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorExtensions {
    pub code: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}
