//! Product Model
//!
//! Catalog products as delivered by the remote `Product` resource. Only the
//! fields needed to evaluate and correct the combo upcharge are kept; every
//! other key in the response is ignored during deserialization.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category name/id reference returned by a category lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryListing {
    pub name: String,
    pub id: i64,
}

/// Scalar value of a product field.
///
/// The catalog is loose about types (prices arrive as `"6.50"` or `6.5`,
/// references as URIs or ints), so fields are kept as delivered and coerced
/// only where a typed value is needed. Nested objects and arrays are kept
/// as [`FieldValue::Other`] so one odd row never sinks its whole listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Exact decimal reading of a numeric or numeric-text field
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(n) => parse_decimal(&n.to_string()),
            FieldValue::Text(s) => parse_decimal(s),
            FieldValue::Null | FieldValue::Bool(_) | FieldValue::Other(_) => None,
        }
    }

    /// Integer reading. Integral floats (`3.0`) are accepted, fractional
    /// values and decimal text (`"3.0"`) are not.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Null | FieldValue::Bool(_) | FieldValue::Other(_) => None,
        }
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<f64> for FieldValue {
    /// Non-finite floats have no JSON form and become `Null`
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null)
    }
}

/// Patchable product record.
///
/// Field order is the column order of the product dumps. Absent keys
/// deserialize to [`FieldValue::Null`] so every record carries all twelve.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRecord {
    pub combo_upcharge: FieldValue,
    pub id: FieldValue,
    pub establishment: FieldValue,
    pub name: FieldValue,
    pub attribute_type: FieldValue,
    pub price: FieldValue,
    pub sorting: FieldValue,
    pub updated_by: FieldValue,
    pub variable_pricing_by: FieldValue,
    pub tax_class: FieldValue,
    pub created_by: FieldValue,
    pub category: FieldValue,
}

impl ItemRecord {
    /// Column names in serialization order
    pub const COLUMNS: [&'static str; 12] = [
        "combo_upcharge",
        "id",
        "establishment",
        "name",
        "attribute_type",
        "price",
        "sorting",
        "updated_by",
        "variable_pricing_by",
        "tax_class",
        "created_by",
        "category",
    ];

    /// Field values in [`Self::COLUMNS`] order
    pub fn values(&self) -> [&FieldValue; 12] {
        [
            &self.combo_upcharge,
            &self.id,
            &self.establishment,
            &self.name,
            &self.attribute_type,
            &self.price,
            &self.sorting,
            &self.updated_by,
            &self.variable_pricing_by,
            &self.tax_class,
            &self.created_by,
            &self.category,
        ]
    }
}

/// Body of the corrective `PATCH /resources/Product/<id>/` request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemUpdatePayload {
    pub name: FieldValue,
    pub price: f64,
    pub establishment: FieldValue,
    pub updated_by: FieldValue,
    pub created_by: FieldValue,
    pub category: FieldValue,
    pub attribute_type: i64,
    pub tax_class: i64,
    pub variable_pricing_by: i64,
    pub sorting: i64,
    /// Mirrors `price` as text
    pub combo_upcharge: String,
}
