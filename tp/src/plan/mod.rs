//! Plan generation pipeline
//!
//! Validate the request, generate an itinerary with the LLM, geocode the
//! destination and every POI concurrently, then normalize into a `PlanResponse`.
//!
//! # Modules
//!
//! - [`request`] - client input parsing and validation
//! - [`generator`] - the LLM call and outcome classification
//! - [`untrusted`] - tolerant readers over the model's JSON
//! - [`normalize`] - canonical POI construction
//! - [`orchestrator`] - the per-request pipeline

use thiserror::Error;

pub mod generator;
pub mod normalize;
pub mod orchestrator;
pub mod request;
pub mod untrusted;

pub use generator::{GeneratorError, GeneratorOutput, ItineraryGenerator};
pub use normalize::{GeocodeStatus, Poi, PoiDefaults, normalize_poi};
pub use orchestrator::{PlanMeta, PlanOrchestrator, PlanResponse};
pub use request::{PlanInput, PlanRequest, parse_interests};
pub use untrusted::{GeneratedPlan, RawPoi};

/// Ways a plan request can fail
///
/// The display text is what the client sees.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// Bad client input
    #[error("{0}")]
    Validation(String),

    /// Server is missing the generator credential
    #[error("{0}")]
    Configuration(String),

    /// Generator backend failed
    #[error("AI request failed: {0}")]
    Upstream(String),

    /// Generator refused to plan for this input
    #[error("{0}")]
    Rejected(String),
}

/// Cut `text` to at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
