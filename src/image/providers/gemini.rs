//! Gemini (Google) image generation provider.

use crate::config::{resolve_api_key_from_env, API_KEY_ENV};
use crate::error::{ImageGenError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{
    GeneratedImage, GenerationMetadata, GenerationRequest, DEFAULT_MIME_TYPE,
};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Base URL of the Gemini models API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Bound on the whole request/response exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Output modalities requested from the model.
const RESPONSE_MODALITIES: [&str; 2] = ["image", "text"];

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Gemini 3 Pro Image preview (highest quality).
    #[default]
    ProImagePreview,
    /// Gemini 2.5 Flash Image (fast, economical).
    FlashImage,
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProImagePreview => "gemini-3-pro-image-preview",
            Self::FlashImage => "gemini-2.5-flash-image",
        }
    }
}

impl std::fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for GeminiProvider.
#[derive(Debug, Clone)]
pub struct GeminiProviderBuilder {
    api_key: Option<String>,
    api_key_env: String,
    model: GeminiModel,
    base_url: String,
    timeout: Duration,
}

impl Default for GeminiProviderBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: API_KEY_ENV.to_string(),
            model: GeminiModel::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GeminiProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GEMINI_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Changes which environment variable the key is read from.
    pub fn api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = var.into();
        self
    }

    /// Sets the Gemini model variant.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Overrides the models base URL (no trailing slash needed).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the provider, resolving the API key.
    ///
    /// Fails with [`ImageGenError::Config`] before any client is created
    /// when no key is available.
    pub fn build(self) -> Result<GeminiProvider> {
        let api_key = resolve_api_key_from_env(self.api_key.as_deref(), &self.api_key_env)?;

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ImageGenError::Network)?;

        Ok(GeminiProvider {
            client,
            api_key,
            model: self.model,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
        })
    }
}

/// Gemini image generation provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: GeminiModel,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiProvider {
    /// Creates a new `GeminiProviderBuilder`.
    pub fn builder() -> GeminiProviderBuilder {
        GeminiProviderBuilder::new()
    }

    /// Returns the configured model.
    pub fn model(&self) -> GeminiModel {
        self.model
    }

    /// Endpoint without the key query parameter; safe to log.
    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model.as_str())
    }

    async fn generate_impl(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let start = Instant::now();
        let url = self.endpoint();
        let body = GeminiRequest::from_generation_request(request);

        tracing::debug!(model = %self.model, endpoint = %url, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageGenError::from_transport(e, self.timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ImageGenError::from_transport(e, self.timeout))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "generateContent failed");
            return Err(ImageGenError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: serde_json::Value = serde_json::from_str(&text)?;
        let found = find_inline_image(&value)?;
        let data = decode_base64_lenient(&found.data)?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            candidate = found.candidate_index,
            part = found.part_index,
            duration_ms,
            "found inline image"
        );

        Ok(GeneratedImage::new(
            data,
            found.mime_type,
            GenerationMetadata {
                model: Some(self.model.as_str().to_string()),
                duration_ms: Some(duration_ms),
                candidate_index: found.candidate_index,
                part_index: found.part_index,
            },
        ))
    }
}

#[async_trait]
impl ImageProvider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        self.generate_impl(request).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }
}

/// The first inline-data part of a response, still base64-encoded.
#[derive(Debug, PartialEq, Eq)]
struct FoundImage {
    mime_type: String,
    data: String,
    candidate_index: usize,
    part_index: usize,
}

/// Scans candidates in order, then parts in order; first inline part wins.
fn find_inline_image(value: &serde_json::Value) -> Result<FoundImage> {
    let response = GeminiResponse::deserialize(value)?;
    let candidates = response.candidates.unwrap_or_default();

    if candidates.is_empty() {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            tracing::debug!(block_reason = %reason, "prompt produced no candidates");
        }
        return Err(ImageGenError::NoCandidates {
            response: pretty(value),
        });
    }

    for (candidate_index, candidate) in candidates.into_iter().enumerate() {
        if let Some(ref reason) = candidate.finish_reason {
            tracing::debug!(
                candidate = candidate_index,
                finish_reason = %reason,
                "scanning candidate"
            );
        }
        let parts = candidate
            .content
            .and_then(|c| c.parts)
            .unwrap_or_default();

        for (part_index, part) in parts.into_iter().enumerate() {
            let Some(inline) = part.inline_data else {
                continue;
            };
            let data = inline.data.ok_or_else(|| {
                ImageGenError::Decode(format!(
                    "inline data in candidate {candidate_index}, part {part_index} has no `data` field"
                ))
            })?;
            return Ok(FoundImage {
                mime_type: inline
                    .mime_type
                    .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
                data,
                candidate_index,
                part_index,
            });
        }
    }

    Err(ImageGenError::NoImage {
        response: pretty(value),
    })
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Decodes base64, tolerating embedded whitespace and missing padding.
fn decode_base64_lenient(input: &str) -> Result<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if let Ok(data) = base64::engine::general_purpose::STANDARD.decode(&cleaned) {
        return Ok(data);
    }

    base64::engine::general_purpose::STANDARD_NO_PAD
        .decode(&cleaned)
        .map_err(|e| ImageGenError::Decode(e.to_string()))
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiTextPart>,
}

#[derive(Debug, Serialize)]
struct GeminiTextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    fn from_generation_request(req: &GenerationRequest) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiTextPart {
                    text: req.prompt.clone(),
                }],
            }],
            generation_config: GeminiConfig {
                response_modalities: RESPONSE_MODALITIES.iter().map(|m| m.to_string()).collect(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Option<Vec<GeminiPartResponse>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    data: Option<String>,
}
