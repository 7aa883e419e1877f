//! Nominatim (OpenStreetMap) search client

use async_trait::async_trait;
use eyre::Context;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Geocode, Geocoder};
use crate::config::GeocoderConfig;

/// Geocoder backed by a Nominatim-compatible `/search` endpoint
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn from_config(config: &GeocoderConfig) -> eyre::Result<Self> {
        debug!(base_url = %config.base_url, "from_config: called");
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build geocoder HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn search(&self, query: &str) -> Result<Value, reqwest::Error> {
        let url = format!("{}/search", self.base_url);
        self.http
            .get(&url)
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str, fallback_label: &str) -> Option<Geocode> {
        debug!(%query, "geocode: called");
        match self.search(query).await {
            Ok(body) => {
                let result = parse_first_candidate(&body, fallback_label);
                if result.is_none() {
                    debug!(%query, "geocode: no usable candidate");
                }
                result
            }
            Err(e) => {
                warn!(%query, error = %e, timeout = e.is_timeout(), "geocode: lookup failed");
                None
            }
        }
    }
}

/// Pull coordinates out of the first search candidate
///
/// Nominatim sends `lat`/`lon` as strings; plain numbers are accepted too.
/// Anything that does not parse to a finite float is a miss.
fn parse_first_candidate(body: &Value, fallback_label: &str) -> Option<Geocode> {
    let first = body.as_array()?.first()?;
    let lat = parse_coordinate(first.get("lat")?)?;
    let lng = parse_coordinate(first.get("lon")?)?;
    let label = first
        .get("display_name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(fallback_label)
        .to_string();

    Some(Geocode { lat, lng, label })
}

fn parse_coordinate(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}
