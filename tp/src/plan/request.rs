//! Client input parsing and validation

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::PlanError;
use super::untrusted::coerce_text;

/// Raw client input, read leniently from the request body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanInput {
    pub destination: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub interests: Vec<String>,
}

impl PlanInput {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Default::default()
        }
    }

    pub fn with_dates(mut self, start_date: Option<String>, end_date: Option<String>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn with_interests(mut self, interests: Vec<String>) -> Self {
        self.interests = interests;
        self
    }

    /// Read `{destination, startDate, endDate, interests}` from a JSON body
    ///
    /// Never fails: non-string fields read as empty, so a body that is not an
    /// object ends up rejected by `into_request` for lack of a destination.
    pub fn from_json(body: &Value) -> Self {
        debug!("PlanInput::from_json: called");
        let string_field = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            destination: string_field("destination").unwrap_or_default(),
            start_date: string_field("startDate"),
            end_date: string_field("endDate"),
            interests: body.get("interests").map(parse_interests).unwrap_or_default(),
        }
    }

    /// Validate and build the request handed to the generator
    pub fn into_request(self, request_time: DateTime<Utc>) -> Result<PlanRequest, PlanError> {
        debug!("PlanInput::into_request: called");
        let destination = self.destination.trim().to_string();
        if destination.is_empty() {
            return Err(PlanError::Validation("Destination is required.".to_string()));
        }

        Ok(PlanRequest {
            destination,
            dates: date_range(self.start_date.as_deref(), self.end_date.as_deref()),
            interests: clean_interests(self.interests),
            request_time,
        })
    }
}

/// A validated planning request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
    pub interests: Vec<String>,
    pub request_time: DateTime<Utc>,
}

/// Parse interests from an array or a comma-separated string
///
/// Entries are trimmed, empty ones dropped, and repeats removed keeping the
/// first occurrence.
pub fn parse_interests(value: &Value) -> Vec<String> {
    let items = match value {
        Value::Array(items) => items.iter().map(coerce_text).collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    clean_interests(items)
}

fn clean_interests(items: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let trimmed = item.trim();
        if !trimmed.is_empty() && !seen.iter().any(|s| s == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    seen
}

fn date_range(start: Option<&str>, end: Option<&str>) -> Option<String> {
    let start = start.map(str::trim).filter(|s| !s.is_empty());
    let end = end.map(str::trim).filter(|s| !s.is_empty());
    match (start, end) {
        (Some(s), Some(e)) => Some(format!("{} to {}", s, e)),
        (Some(d), None) | (None, Some(d)) => Some(d.to_string()),
        (None, None) => None,
    }
}
