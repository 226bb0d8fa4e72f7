//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait for structured LLM output generation.
//! All providers return `LlmResponse` with token usage metrics.
//!
//! The language model is an external collaborator: it accepts a prompt plus
//! generation parameters and returns free-form text that should contain a
//! JSON object, possibly fenced. Providers are responsible for transport
//! only; JSON extraction lives in [`crate::llm::extract`].

mod gemini;
mod mock;

pub use gemini::GeminiProvider;
pub use mock::MockProvider;

pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::types::Result;

// =============================================================================
// Generation Request
// =============================================================================

/// One structured-output generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fully assembled prompt text
    pub prompt: String,
    /// Expected response shape, serialized into the system instruction
    pub schema: Value,
    /// Generation temperature for this call
    pub temperature: f32,
    /// Maximum output tokens for this call
    pub max_output_tokens: usize,
}

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Complete LLM response including raw text and usage metrics
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Raw generated text (JSON extraction happens downstream)
    pub text: String,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Wall-clock response time in milliseconds
    pub elapsed_ms: u64,
    /// Provider and model info
    pub metadata: ResponseMetadata,
}

/// Token usage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    /// Model used
    pub model: String,
    /// Provider name
    pub provider: String,
}

/// Shared LLM provider handle used across pipeline stages
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// LLM Provider trait for structured output generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Submit one generation request and return the raw response text with
    /// usage metrics. Transport failures come back as `WardenError::Llm`
    /// with a classified category.
    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &LlmConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.clone())?)),
        "mock" => Ok(Arc::new(MockProvider::new())),
        _ => Err(crate::types::WardenError::Config(format!(
            "Unknown provider: {}. Supported: gemini, mock",
            config.provider
        ))),
    }
}
