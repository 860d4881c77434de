//! Blocking client for the Gemini `generateContent` endpoint.
//!
//! Behaviour:
//! - One `POST {base}/v1beta/models/{model}:generateContent` per call, no internal retry.
//! - Non-success statuses and undecodable bodies are errors.
//! - Blocked or empty generations are returned as data, never as errors.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::coach::core::config::GeminiConfig;
use crate::llm::backend::TextGenerator;
use crate::llm::error::LlmError;
use crate::llm::types::{
    BlockThreshold, Candidate, FinishReason, GenerationRequest, GenerationResult, HarmCategory,
    PromptBlockReason,
};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Max body bytes kept in a status error.
const ERROR_BODY_CHARS: usize = 300;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: Vec<WireContent<'a>>,
    generation_config: WireGenerationConfig,
    safety_settings: Vec<WireSafetySetting>,
}

#[derive(Serialize)]
struct WireContent<'a> {
    role: &'a str,
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Serialize)]
struct WireSafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    prompt_feedback: Option<WirePromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    content: Option<WireResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponseContent {
    #[serde(default)]
    parts: Vec<WireResponsePart>,
}

#[derive(Debug, Deserialize)]
struct WireResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePromptFeedback {
    block_reason: Option<String>,
}

/// Blocking Gemini client.
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    /// Build a client from configuration.
    ///
    /// A missing API key is not an error here; every call then fails with
    /// [`LlmError::ApiKeyRequired`].
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty());

        let endpoint = endpoint_url(&config.base_url, &config.model)?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model.clone(),
        })
    }

    /// Endpoint the client posts to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Whether an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// `{base}/v1beta/models/{model}:generateContent`, keeping any path prefix on `base`.
fn endpoint_url(base_url: &str, model: &str) -> Result<Url, LlmError> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(&format!("v1beta/models/{model}:generateContent"))?)
}

impl TextGenerator for GeminiClient {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, LlmError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(LlmError::ApiKeyRequired("gemini".to_string()));
        };

        let body = to_wire(request);
        debug!(
            model = %self.model,
            prompt_chars = request.prompt.chars().count(),
            "posting generateContent"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(LlmError::HttpStatus {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_CHARS).collect(),
            });
        }

        let wire: WireResponse = serde_json::from_str(&text)?;
        Ok(from_wire(wire))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn to_wire(request: &GenerationRequest) -> WireRequest<'_> {
    WireRequest {
        contents: vec![WireContent {
            role: "user",
            parts: vec![WirePart {
                text: &request.prompt,
            }],
        }],
        generation_config: WireGenerationConfig {
            max_output_tokens: request.sampling.max_output_tokens,
            temperature: request.sampling.temperature,
            top_p: request.sampling.top_p,
            top_k: request.sampling.top_k,
        },
        safety_settings: request
            .safety
            .iter()
            .map(|setting| WireSafetySetting {
                category: category_code(setting.category),
                threshold: threshold_code(setting.threshold),
            })
            .collect(),
    }
}

fn from_wire(wire: WireResponse) -> GenerationResult {
    let prompt_block = wire
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
        .map(|reason| parse_block_reason(&reason));

    let candidates = wire
        .candidates
        .into_iter()
        .map(|candidate| Candidate {
            finish_reason: candidate.finish_reason.as_deref().map(parse_finish_reason),
            fragments: candidate
                .content
                .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
                .unwrap_or_default(),
        })
        .collect();

    GenerationResult {
        candidates,
        prompt_block,
    }
}

const fn category_code(category: HarmCategory) -> &'static str {
    match category {
        HarmCategory::Harassment => "HARM_CATEGORY_HARASSMENT",
        HarmCategory::HateSpeech => "HARM_CATEGORY_HATE_SPEECH",
        HarmCategory::SexuallyExplicit => "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        HarmCategory::DangerousContent => "HARM_CATEGORY_DANGEROUS_CONTENT",
    }
}

const fn threshold_code(threshold: BlockThreshold) -> &'static str {
    match threshold {
        BlockThreshold::BlockMost => "BLOCK_LOW_AND_ABOVE",
        BlockThreshold::BlockSome => "BLOCK_MEDIUM_AND_ABOVE",
        BlockThreshold::BlockFew => "BLOCK_ONLY_HIGH",
        BlockThreshold::BlockNone => "BLOCK_NONE",
    }
}

fn parse_finish_reason(value: &str) -> FinishReason {
    match value {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" | "SPII" => FinishReason::Safety,
        "RECITATION" => FinishReason::Recitation,
        _ => FinishReason::Other,
    }
}

fn parse_block_reason(value: &str) -> PromptBlockReason {
    match value {
        "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" => PromptBlockReason::Safety,
        _ => PromptBlockReason::Other,
    }
}
