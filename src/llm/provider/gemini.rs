//! Gemini API Provider
//!
//! LLM provider using Google's Generative Language API, the model service
//! the safety application runs against in production.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::{GenerationRequest, LlmProvider, LlmResponse, ResponseMetadata, TokenUsage};
use crate::config::LlmConfig;
use crate::constants::llm as llm_constants;
use crate::types::{ErrorClassifier, Result, WardenError};

/// Gemini API Provider with secure API key handling
pub struct GeminiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let api_key_str = std::env::var("GEMINI_API_KEY").map_err(|_| {
            WardenError::Config(
                "Gemini API key not found. Set the GEMINI_API_KEY env var".to_string(),
            )
        })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| llm_constants::GEMINI_API_BASE.to_string());

        let model = config
            .model
            .unwrap_or_else(|| llm_constants::DEFAULT_GEMINI_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                WardenError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model,
            client,
        })
    }

    fn build_request(&self, request: &GenerationRequest) -> GenerateContentRequest {
        // The schema rides in the prompt; Gemini's JSON mode enforces syntax
        // but the shape contract comes from the stage instructions.
        let schema_str = serde_json::to_string_pretty(&request.schema)
            .unwrap_or_else(|_| "{}".to_string());

        let text = format!(
            "{}\n\nRespond with ONLY a valid JSON object matching this shape:\n```json\n{}\n```",
            request.prompt, schema_str
        );

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
                response_mime_type: "application/json".to_string(),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse> {
        info!(
            model = %self.model,
            temperature = request.temperature,
            "Generating with Gemini"
        );

        let start_time = Instant::now();
        let body = self.build_request(request);
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base, self.model
        );

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                WardenError::Llm(ErrorClassifier::classify(
                    &format!("Gemini request failed: {}", e),
                    "gemini",
                ))
            })?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(WardenError::Llm(ErrorClassifier::classify_http_status(
                status,
                &format!("Gemini API error: {}", text),
                "gemini",
            )));
        }

        let response_body: GenerateContentResponse = response.json().await.map_err(|e| {
            WardenError::Llm(ErrorClassifier::classify(
                &format!("Failed to parse Gemini response envelope: {}", e),
                "gemini",
            ))
        })?;

        let usage = response_body
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        let text = response_body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                WardenError::Llm(ErrorClassifier::classify(
                    "No candidate content in Gemini response",
                    "gemini",
                ))
            })?;

        Ok(LlmResponse {
            text,
            usage,
            elapsed_ms: elapsed.as_millis() as u64,
            metadata: ResponseMetadata {
                model: self.model.clone(),
                provider: "gemini".to_string(),
            },
        })
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: usize,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
}
