//! SiteWarden - Construction Site Safety Analysis Pipeline
//!
//! A four-stage AI analysis pipeline that turns a live site snapshot into a
//! Go/No-Go safety decision: validate the collected data, assess and score
//! hazards, predict the most likely incident through the Swiss cheese
//! accident model, then synthesize the authorization decision.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sitewarden::{AnalysisPipeline, Config, ContextCollector, StageExecutor};
//! use sitewarden::llm::create_provider;
//!
//! let config = Config::default();
//! let provider = create_provider(&config.llm)?;
//! let executor = StageExecutor::new(
//!     provider,
//!     config.retry.clone(),
//!     Duration::from_secs(config.llm.timeout_secs),
//! );
//! let pipeline = AnalysisPipeline::new(collector, executor, config.llm.max_output_tokens);
//! let report = pipeline.run("site-42").await?;
//! ```
//!
//! ## Modules
//!
//! - [`collect`]: site context assembly from external services
//! - [`pipeline`]: the four-stage orchestrator, prompts, and stage executor
//! - [`adapter`]: normalization of stored reports from older producers
//! - [`report`]: canonical report rendering (JSON and text)
//! - [`llm`]: provider abstraction, JSON extraction, timeouts

pub mod adapter;
pub mod cli;
pub mod collect;
pub mod config;
pub mod constants;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod services;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{CollectionConfig, Config, ConfigLoader, LlmConfig, RetryConfig, ServiceConfig};

// Error Types
pub use types::error::{ErrorCategory, Result, WardenError};

// Domain model
pub use types::{GoNoGo, Percentage, SafetyReport, SiteContext};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use adapter::{ReportVariant, VersionAdapter};
pub use collect::ContextCollector;
pub use pipeline::{
    AnalysisPipeline, FailureKind, PipelineFailure, PipelineStage, StageExecutor,
};

// =============================================================================
// LLM Re-exports
// =============================================================================

pub use llm::{
    GeminiProvider, LlmProvider, LlmResponse, MockProvider, SharedProvider, TimeoutConfig,
    create_provider, with_timeout,
};
