//! Boundary types for generator output
//!
//! The model's JSON is read through these wrappers only. Every accessor
//! tolerates a missing key or a value of the wrong type and answers `None`
//! (or an empty list) instead of failing.

use serde_json::Value;

/// A plan as the model produced it: `{destination, bestTimeToVisit,
/// centerDescription, pois}`, none of it guaranteed
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    raw: Value,
}

impl GeneratedPlan {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn destination(&self) -> Option<String> {
        text_field(&self.raw, "destination")
    }

    pub fn best_time_to_visit(&self) -> Option<String> {
        text_field(&self.raw, "bestTimeToVisit")
    }

    pub fn center_description(&self) -> Option<String> {
        text_field(&self.raw, "centerDescription")
    }

    /// POI records in generator order; a non-array `pois` yields none
    pub fn pois(&self) -> Vec<RawPoi> {
        match self.raw.get("pois") {
            Some(Value::Array(items)) => items.iter().cloned().map(RawPoi::new).collect(),
            _ => Vec::new(),
        }
    }

}

/// One POI record as the model produced it
#[derive(Debug, Clone, PartialEq)]
pub struct RawPoi {
    raw: Value,
}

impl RawPoi {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn name(&self) -> Option<String> {
        text_field(&self.raw, "name")
    }

    pub fn summary(&self) -> Option<String> {
        text_field(&self.raw, "summary")
    }

    pub fn category(&self) -> Option<String> {
        text_field(&self.raw, "category")
    }

    pub fn area(&self) -> Option<String> {
        text_field(&self.raw, "area")
    }

    pub fn best_time(&self) -> Option<String> {
        text_field(&self.raw, "bestTime")
    }

    pub fn address(&self) -> Option<String> {
        text_field(&self.raw, "address")
    }

    pub fn highlights(&self, limit: usize) -> Vec<String> {
        text_list(self.raw.get("highlights"), limit)
    }

    pub fn tags(&self, limit: usize) -> Vec<String> {
        text_list(self.raw.get("tags"), limit)
    }
}

/// Read a scalar field as text
///
/// Strings count when non-blank and are returned as written; numbers and
/// `true` are rendered. Objects, arrays, `null`, `false` and blank strings are
/// absent.
pub fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => (!s.trim().is_empty()).then(|| s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Render any JSON value as text; `null` reads as `"null"`
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First `limit` entries of an array, each coerced to text; anything but an
/// array yields an empty list
pub fn text_list(value: Option<&Value>, limit: usize) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().take(limit).map(coerce_text).collect(),
        _ => Vec::new(),
    }
}
