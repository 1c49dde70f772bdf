use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Body of `POST /recommendation`.
///
/// Parsing is lenient past the JSON syntax check: missing or mistyped fields
/// become empty values, and an empty crop resolves to the generic profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationQuery {
    pub state: String,
    pub crop: String,
    pub location: String,
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct InvalidJson {
    pub detail: String,
}

impl fmt::Display for InvalidJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request body is not valid JSON: {}", self.detail)
    }
}

impl std::error::Error for InvalidJson {}

impl RecommendationQuery {
    pub fn from_json_slice(body: &[u8]) -> Result<Self, InvalidJson> {
        let value = serde_json::from_slice::<Value>(body).map_err(|e| InvalidJson {
            detail: e.to_string(),
        })?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        Self {
            state: text_field(value, "state"),
            crop: text_field(value, "crop"),
            location: text_field(value, "location"),
            quantity: value.get("quantity").and_then(quantity_field),
        }
    }
}

fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn quantity_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|q| q.is_finite())
}
