//! Per-request plan pipeline

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::generator::{GeneratorError, GeneratorOutput, ItineraryGenerator};
use super::normalize::{Poi, PoiDefaults, normalize_poi};
use super::request::PlanInput;
use super::untrusted::{GeneratedPlan, RawPoi};
use super::{PlanError, truncate_chars};
use crate::config::{Config, PlanConfig};
use crate::geocode::{Geocode, Geocoder, create_geocoder};
use crate::llm::create_client;

/// The finished, client-safe plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub destination: String,
    pub best_time_to_visit: String,
    pub center: Option<Geocode>,
    pub pois: Vec<Poi>,
    pub meta: PlanMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMeta {
    pub model: String,
    pub interests: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Drives generation, geocoding and normalization for one request at a time
///
/// Holds no per-request state, so one instance serves concurrent requests.
pub struct PlanOrchestrator {
    generator: ItineraryGenerator,
    geocoder: Arc<dyn Geocoder>,
    limits: PlanConfig,
}

impl PlanOrchestrator {
    pub fn new(generator: ItineraryGenerator, geocoder: Arc<dyn Geocoder>, limits: PlanConfig) -> Self {
        Self {
            generator,
            geocoder,
            limits,
        }
    }

    /// Wire up the OpenAI generator and Nominatim geocoder from config
    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        debug!("PlanOrchestrator::from_config: called");
        let llm = create_client(&config.llm)?;
        let geocoder = create_geocoder(&config.geocoder)?;
        Ok(Self::new(
            ItineraryGenerator::new(llm, &config.llm),
            geocoder,
            config.plan.clone(),
        ))
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Run the whole pipeline for one client request
    pub async fn plan(&self, input: PlanInput) -> Result<PlanResponse, PlanError> {
        let span = info_span!("plan", request_id = %Uuid::now_v7());
        self.run(input).instrument(span).await
    }

    async fn run(&self, input: PlanInput) -> Result<PlanResponse, PlanError> {
        let request = input.into_request(Utc::now())?;
        info!(destination = %request.destination, interests = ?request.interests, "plan: generating");

        let plan = match self.generator.generate(&request).await {
            Ok(GeneratorOutput::Plan(plan)) => plan,
            Ok(GeneratorOutput::Rejected { reason }) => return Err(PlanError::Rejected(reason)),
            Err(GeneratorError::Configuration { env_var }) => {
                warn!(%env_var, "plan: generator credential missing");
                return Err(PlanError::Configuration(format!("Missing {} on the server.", env_var)));
            }
            Err(GeneratorError::Upstream { status, message }) => {
                warn!(?status, error = %message, "plan: generator failed");
                return Err(PlanError::Upstream(
                    truncate_chars(&message, self.limits.error_message_chars).to_string(),
                ));
            }
        };

        let raw_pois: Vec<RawPoi> = plan.pois().into_iter().take(self.limits.max_pois).collect();
        let (center, geocodes) = self.geocode_all(&request.destination, &plan, &raw_pois).await;

        let defaults = PoiDefaults::new(plan.best_time_to_visit())
            .with_limits(self.limits.max_highlights, self.limits.max_tags);
        let pois: Vec<Poi> = raw_pois
            .iter()
            .zip(geocodes.iter())
            .enumerate()
            .map(|(ordinal, (raw, geocode))| normalize_poi(raw, geocode.as_ref(), &defaults, ordinal))
            .collect();

        let pinned = pois.iter().filter(|p| p.location.is_some()).count();
        info!(pois = pois.len(), pinned, center = center.is_some(), "plan: assembled");

        Ok(PlanResponse {
            destination: plan.destination().unwrap_or_else(|| request.destination.clone()),
            best_time_to_visit: plan.best_time_to_visit().unwrap_or_default(),
            center,
            pois,
            meta: PlanMeta {
                model: self.generator.model().to_string(),
                interests: request.interests,
                generated_at: Utc::now(),
            },
        })
    }

    /// Geocode the map center and every POI concurrently
    ///
    /// Results line up with `pois` by index.
    async fn geocode_all(
        &self,
        destination: &str,
        plan: &GeneratedPlan,
        pois: &[RawPoi],
    ) -> (Option<Geocode>, Vec<Option<Geocode>>) {
        debug!(pois = pois.len(), "geocode_all: called");
        let center_label = plan.center_description().unwrap_or_else(|| destination.to_string());
        let center = self.geocoder.geocode(destination, &center_label);
        let lookups = join_all(pois.iter().map(|poi| self.geocode_poi(poi, destination)));

        tokio::join!(center, lookups)
    }

    async fn geocode_poi(&self, poi: &RawPoi, destination: &str) -> Option<Geocode> {
        let name = poi.name()?;
        let label = poi.area().unwrap_or_else(|| destination.to_string());
        self.geocoder.geocode(&format!("{}, {}", name, destination), &label).await
    }
}
