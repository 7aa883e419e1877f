//! Itinerary generator
//!
//! Turns a validated plan request into one LLM call and parses the reply. The
//! reply is classified but not validated; its shape is the normalizer's
//! problem.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::request::PlanRequest;
use super::truncate_chars;
use super::untrusted::{GeneratedPlan, text_field};
use crate::config::LlmConfig;
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, ResponseFormat, StopReason};

/// Upstream bodies kept in error messages
const MAX_UPSTREAM_BODY_CHARS: usize = 300;

pub const SYSTEM_PROMPT: &str = r#"You are an expert travel planner that only responds with concise JSON.
Your job is to design a practical, map-friendly plan with 5-10 points of interest (POIs) for a given destination.

Rules:
- Return only valid JSON with keys: destination, bestTimeToVisit, centerDescription, pois.
- pois is an array of 5-10 objects; each object must include: name, summary, category, highlights (2-3 succinct bullet strings), bestTime, tags (2-4 short labels), area (neighborhood/nearby landmark), and optional address.
- Keep text tight and factual. No markdown, no prose outside JSON.
- Include a short bestTimeToVisit for the overall destination.
- centerDescription should briefly describe the best map center (e.g., "Downtown Reykjavik near City Hall").
- If the user asks for anything unrelated to travel itineraries, respond with {"error":"Only travel planning requests are supported."}.
- Assume responses are parsed by software; do not add commentary.
- Keep responses under 700 tokens.
"#;

/// What the model answered
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorOutput {
    /// Something plan-shaped (possibly garbled)
    Plan(GeneratedPlan),

    /// The model declined with `{"error": "..."}`
    Rejected { reason: String },
}

impl GeneratorOutput {
    /// Classify parsed model output
    ///
    /// An object carrying a textual `error` and no `pois` array is a refusal;
    /// everything else is treated as a plan.
    pub fn classify(value: Value) -> Self {
        let has_pois = value.get("pois").is_some_and(Value::is_array);
        match text_field(&value, "error") {
            Some(reason) if !has_pois => GeneratorOutput::Rejected { reason },
            _ => GeneratorOutput::Plan(GeneratedPlan::new(value)),
        }
    }
}

/// Generator failures
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// No credential configured; nothing was sent
    #[error("Missing {env_var} on the server.")]
    Configuration { env_var: String },

    /// The backend failed or answered with something unusable
    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },
}

impl GeneratorError {
    fn upstream(message: impl Into<String>) -> Self {
        GeneratorError::Upstream {
            status: None,
            message: message.into(),
        }
    }
}

impl From<LlmError> for GeneratorError {
    fn from(error: LlmError) -> Self {
        match error {
            LlmError::MissingApiKey { env_var } => GeneratorError::Configuration { env_var },
            LlmError::ApiError { status, message } => GeneratorError::Upstream {
                status: Some(status),
                message: format!("OPENAI_{}: {}", status, truncate_chars(&message, MAX_UPSTREAM_BODY_CHARS)),
            },
            other => GeneratorError::upstream(other.to_string()),
        }
    }
}

/// Request fields plus the output constraints, as sent in the user message
#[derive(Serialize)]
struct PlanningPayload<'a> {
    #[serde(flatten)]
    request: &'a PlanRequest,
    constraints: Constraints,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Constraints {
    poi_count: &'static str,
    highlights_per_poi: &'static str,
    format: &'static str,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            poi_count: "5-10",
            highlights_per_poi: "2-3",
            format: "JSON only",
        }
    }
}

/// Produces itineraries from an LLM
pub struct ItineraryGenerator {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
    temperature: f32,
}

impl ItineraryGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, config: &LlmConfig) -> Self {
        Self {
            llm,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    fn build_request(&self, request: &PlanRequest) -> Result<CompletionRequest, GeneratorError> {
        let payload = PlanningPayload {
            request,
            constraints: Constraints::default(),
        };
        let user_message = serde_json::to_string(&payload).map_err(|e| GeneratorError::upstream(e.to_string()))?;

        Ok(CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(user_message)],
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
            response_format: ResponseFormat::JsonObject,
        })
    }

    /// Ask the model for a plan; one call, no retries
    pub async fn generate(&self, request: &PlanRequest) -> Result<GeneratorOutput, GeneratorError> {
        debug!(destination = %request.destination, "generate: called");
        let completion = self.build_request(request)?;
        let response = self.llm.complete(completion).await?;

        if response.stop_reason == StopReason::MaxTokens {
            warn!("generate: model hit the token ceiling, output may be cut off");
        }

        let content = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| GeneratorError::upstream("model returned no content"))?;

        let value: Value = serde_json::from_str(&content)
            .map_err(|e| GeneratorError::upstream(format!("model returned invalid JSON: {}", e)))?;

        let output = GeneratorOutput::classify(value);
        if let GeneratorOutput::Rejected { reason } = &output {
            info!(%reason, "generate: model rejected the request");
        }
        Ok(output)
    }
}
