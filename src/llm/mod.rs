//! LLM provider abstraction, JSON extraction, and timeout helpers.

pub mod extract;
pub mod provider;
pub mod timeout;

pub use extract::extract_json;
pub use provider::{
    GeminiProvider, GenerationRequest, LlmProvider, LlmResponse, MockProvider, ResponseMetadata,
    SharedProvider, TokenUsage, create_provider,
};
pub use timeout::{TimeoutConfig, with_timeout};
