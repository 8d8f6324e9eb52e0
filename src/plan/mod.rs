//! Product-plan schema accumulated over a conversation.
//!
//! Every field is `Option<String>`: `None` means explicitly cleared (the
//! change path), an empty string means "not yet provided" and is replaced by
//! the accumulated value (the baseline default on the first turn) after
//! extraction.

use crate::providers::base::ResponseSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

mod store;

pub use store::{MemoryPlanStore, PlanStore};

/// Field names in schema order, matching the serialized keys.
pub const FIELDS: [&str; 11] = [
    "product_name",
    "product_description",
    "product_family",
    "product_group",
    "product_offer_price",
    "pop_type",
    "price_category",
    "price_mode",
    "product_specification_type",
    "data_allowance",
    "voice_allowance",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPlan {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub product_family: Option<String>,
    #[serde(default)]
    pub product_group: Option<String>,
    #[serde(default)]
    pub product_offer_price: Option<String>,
    #[serde(default)]
    pub pop_type: Option<String>,
    #[serde(default)]
    pub price_category: Option<String>,
    #[serde(default)]
    pub price_mode: Option<String>,
    #[serde(default)]
    pub product_specification_type: Option<String>,
    #[serde(default)]
    pub data_allowance: Option<String>,
    #[serde(default)]
    pub voice_allowance: Option<String>,
}

impl ProductPlan {
    /// Baseline schema handed to the extractor on the first product turn.
    pub fn defaults() -> Self {
        Self {
            product_name: Some(String::new()),
            product_description: Some(String::new()),
            product_family: Some("GSM".to_string()),
            product_group: Some("Prepaid".to_string()),
            product_offer_price: Some(String::new()),
            pop_type: Some("Normal".to_string()),
            price_category: Some("Base Price".to_string()),
            price_mode: Some("Non-Recurring".to_string()),
            product_specification_type: Some("ADDON".to_string()),
            data_allowance: Some(String::new()),
            voice_allowance: Some(String::new()),
        }
    }

    fn field(&self, name: &str) -> Option<&Option<String>> {
        match name {
            "product_name" => Some(&self.product_name),
            "product_description" => Some(&self.product_description),
            "product_family" => Some(&self.product_family),
            "product_group" => Some(&self.product_group),
            "product_offer_price" => Some(&self.product_offer_price),
            "pop_type" => Some(&self.pop_type),
            "price_category" => Some(&self.price_category),
            "price_mode" => Some(&self.price_mode),
            "product_specification_type" => Some(&self.product_specification_type),
            "data_allowance" => Some(&self.data_allowance),
            "voice_allowance" => Some(&self.voice_allowance),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "product_name" => Some(&mut self.product_name),
            "product_description" => Some(&mut self.product_description),
            "product_family" => Some(&mut self.product_family),
            "product_group" => Some(&mut self.product_group),
            "product_offer_price" => Some(&mut self.product_offer_price),
            "pop_type" => Some(&mut self.pop_type),
            "price_category" => Some(&mut self.price_category),
            "price_mode" => Some(&mut self.price_mode),
            "product_specification_type" => Some(&mut self.product_specification_type),
            "data_allowance" => Some(&mut self.data_allowance),
            "voice_allowance" => Some(&mut self.voice_allowance),
            _ => None,
        }
    }

    /// Merge extracted values over the accumulated schema: empty strings fall
    /// back to `current`'s value for that field, everything else (including
    /// explicit null) is kept.
    pub fn fill_from_extracted(current: &ProductPlan, extracted: ProductPlan) -> ProductPlan {
        let mut merged = extracted;
        for name in FIELDS {
            let is_empty = matches!(merged.field(name), Some(Some(v)) if v.trim().is_empty());
            if is_empty && let (Some(slot), Some(fallback)) =
                (merged.field_mut(name), current.field(name))
            {
                *slot = fallback.clone();
            }
        }
        merged
    }

    /// Set exactly one field to null. Returns false when the name does not
    /// match any schema field.
    pub fn set_null(&mut self, field: &str) -> bool {
        match self.field_mut(field) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    /// Copy of the plan with the target field nulled and every other field
    /// keeping its accumulated value.
    pub fn nulled_field(&self, field: &str) -> ProductPlan {
        let mut plan = self.clone();
        plan.set_null(field);
        plan
    }

    /// Literal "0" values read as missing in the confirmation display.
    pub fn normalize_zeroes(&mut self) {
        for name in FIELDS {
            if let Some(slot) = self.field_mut(name)
                && matches!(slot.as_deref(), Some("0"))
            {
                *slot = Some("None".to_string());
            }
        }
    }

    /// Structured-output schema for providers that accept one.
    pub fn response_schema() -> ResponseSchema {
        let mut properties = serde_json::Map::new();
        for name in FIELDS {
            properties.insert(name.to_string(), json!({"type": ["string", "null"]}));
        }
        ResponseSchema {
            name: "product_plan".to_string(),
            schema: json!({
                "type": "object",
                "properties": properties,
                "required": FIELDS,
                "additionalProperties": false
            }),
        }
    }
}
