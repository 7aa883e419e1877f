//! Geocoding adapter
//!
//! Resolves free-text place descriptions to coordinates. A miss is a normal
//! outcome (`None`), never an error: the worst a geocoder can do to a plan is
//! leave one pin off the map.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod nominatim;

pub use nominatim::NominatimGeocoder;

use crate::config::GeocoderConfig;

/// A resolved place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geocode {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
}

impl Geocode {
    pub fn location(&self) -> Location {
        Location {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Bare coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Text-to-coordinates lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `query`; `fallback_label` names the result when the service
    /// returns no display name
    async fn geocode(&self, query: &str, fallback_label: &str) -> Option<Geocode>;
}

/// Create the geocoder described by the config
pub fn create_geocoder(config: &GeocoderConfig) -> eyre::Result<Arc<dyn Geocoder>> {
    Ok(Arc::new(NominatimGeocoder::from_config(config)?))
}
