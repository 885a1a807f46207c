use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partshop_core::{Entity, PartId};

use crate::category::Category;
use crate::input::PartPatch;

/// A computer component listed in the catalog.
///
/// This is the stored document shape. `id` and `created_at` are assigned once
/// at creation and never change; every other field is only mutated through a
/// validated [`PartPatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: PartId,
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Part {
    /// Apply a partial update in place. Fields absent from the patch are left unchanged.
    pub fn apply(&mut self, patch: &PartPatch) {
        if let Some(name) = patch.name() {
            self.name = name.to_string();
        }
        if let Some(category) = patch.category() {
            self.category = category;
        }
        if let Some(price) = patch.price() {
            self.price = price;
        }
        if let Some(stock) = patch.stock() {
            self.stock = stock;
        }
        if let Some(description) = patch.description() {
            self.description = Some(description.to_string());
        }
    }
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
