//! Field rules for creating and updating yarn records.

use serde_json::Value;
use validator::Validate;

use crate::error::CoreError;
use crate::labels::{FiberContent, YarnWeight};
use crate::payload::{self, Payload};

/// Scalar fields of a yarn record, as stored. `added_at` is server-owned
/// and therefore not part of the editable fields.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct YarnFields {
    #[validate(length(max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub brand: String,
    #[validate(length(max = 255))]
    pub color: String,
    #[validate(range(min = 0))]
    pub quantity: i64,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub fiber_content: FiberContent,
    pub weight: YarnWeight,
}

/// A validated partial update. `None` means "key absent, keep as is".
///
/// For non-nullable fields a `null` value counts as absent; for the
/// nullable `imageUrl` and `notes` it clears the value (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YarnPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub quantity: Option<i64>,
    pub image_url: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub fiber_content: Option<FiberContent>,
    pub weight: Option<YarnWeight>,
}

impl YarnPatch {
    /// Parse a request body. Fails on the first invalid field.
    pub fn from_payload(payload: &Payload) -> Result<Self, CoreError> {
        let text = |keys: &[&str], field: &str| -> Result<Option<String>, CoreError> {
            payload::lookup_non_null(payload, keys)
                .map(|v| payload::string_value(field, v))
                .transpose()
        };
        let nullable = |field: &str| -> Result<Option<Option<String>>, CoreError> {
            payload::lookup(payload, &[field])
                .map(|v| payload::optional_string(field, v))
                .transpose()
        };

        let quantity = payload::lookup_non_null(payload, &["quantity"])
            .map(|v| payload::integer_value("quantity", v))
            .transpose()?;
        if let Some(q) = quantity {
            if q < 0 {
                return Err(CoreError::Validation(
                    "Field 'quantity' must not be negative".into(),
                ));
            }
        }

        let fiber_content = payload::lookup_non_null(payload, &["fiberContent", "FiberContent"])
            .map(|v| label_value("fiberContent", v).and_then(|s| FiberContent::parse(&s)))
            .transpose()?;

        let weight = payload::lookup_non_null(payload, &["weight", "Weight"])
            .map(|v| label_value("weight", v).and_then(|s| YarnWeight::parse(&s)))
            .transpose()?;

        Ok(Self {
            name: text(&["name"], "name")?,
            brand: text(&["brand"], "brand")?,
            color: text(&["color"], "color")?,
            quantity,
            image_url: nullable("imageUrl")?,
            notes: nullable("notes")?,
            fiber_content,
            weight,
        })
    }

    /// Build the fields of a new yarn. Every non-nullable field is required.
    pub fn create(&self) -> Result<YarnFields, CoreError> {
        let mut missing = Vec::new();
        let name = required(&self.name, "name", &mut missing);
        let brand = required(&self.brand, "brand", &mut missing);
        let color = required(&self.color, "color", &mut missing);
        let quantity = required(&self.quantity, "quantity", &mut missing);
        let fiber_content = required(&self.fiber_content, "fiberContent", &mut missing);
        let weight = required(&self.weight, "weight", &mut missing);

        let (
            Some(name),
            Some(brand),
            Some(color),
            Some(quantity),
            Some(fiber_content),
            Some(weight),
        ) = (name, brand, color, quantity, fiber_content, weight)
        else {
            return Err(CoreError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )));
        };

        Ok(YarnFields {
            name,
            brand,
            color,
            quantity,
            image_url: self.image_url.clone().flatten(),
            notes: self.notes.clone().flatten(),
            fiber_content,
            weight,
        })
    }

    /// Apply the patch on top of `current`.
    pub fn apply(&self, current: &YarnFields) -> YarnFields {
        YarnFields {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            brand: self.brand.clone().unwrap_or_else(|| current.brand.clone()),
            color: self.color.clone().unwrap_or_else(|| current.color.clone()),
            quantity: self.quantity.unwrap_or(current.quantity),
            image_url: self
                .image_url
                .clone()
                .unwrap_or_else(|| current.image_url.clone()),
            notes: self.notes.clone().unwrap_or_else(|| current.notes.clone()),
            fiber_content: self.fiber_content.unwrap_or(current.fiber_content),
            weight: self.weight.unwrap_or(current.weight),
        }
    }
}

/// Returns the previous image URL when the update changed it.
pub fn replaced_image(previous: &YarnFields, next: &YarnFields) -> Option<String> {
    match (&previous.image_url, &next.image_url) {
        (Some(old), new) if new.as_deref() != Some(old.as_str()) => Some(old.clone()),
        _ => None,
    }
}

fn label_value(field: &str, value: &Value) -> Result<String, CoreError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(CoreError::Validation(format!(
            "Field '{field}' must be a label string"
        ))),
    }
}

/// Clone a required value, recording `field` in `missing` when absent.
fn required<T: Clone>(
    value: &Option<T>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<T> {
    if value.is_none() {
        missing.push(field);
    }
    value.clone()
}
