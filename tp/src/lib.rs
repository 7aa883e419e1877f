//! Trip planner - destination to map-ready itinerary
//!
//! Takes a free-text destination (plus optional interests and dates), asks an
//! LLM for a short list of points of interest, geocodes each one, and returns
//! a normalized plan that is safe to render no matter what the model sent.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and OpenAI implementation
//! - [`geocode`] - geocoder trait and Nominatim implementation
//! - [`plan`] - request validation, generation, normalization, orchestration
//! - [`server`] - HTTP API
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod geocode;
pub mod llm;
pub mod plan;
pub mod server;

// Re-export commonly used types
pub use config::{Config, GeocoderConfig, LlmConfig, PlanConfig, ServerConfig};
pub use geocode::{Geocode, Geocoder, Location, NominatimGeocoder};
pub use llm::{LlmClient, LlmError, OpenAIClient, create_client};
pub use plan::{
    GeocodeStatus, GeneratedPlan, GeneratorOutput, ItineraryGenerator, PlanError, PlanInput, PlanOrchestrator,
    PlanRequest, PlanResponse, Poi, RawPoi,
};
pub use server::{ApiError, AppState, router};
