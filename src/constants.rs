//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Stage executor retry constants
pub mod retry {
    /// Maximum attempts per stage call (transport failures only)
    pub const MAX_ATTEMPTS: u8 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 500;

    /// Maximum delay between retries (seconds)
    pub const MAX_DELAY_SECS: u64 = 30;

    /// Backoff multiplier
    pub const BACKOFF_FACTOR: f32 = 2.0;
}

/// Network and timeout constants
pub mod network {
    /// Default timeout for LLM requests (seconds)
    pub const LLM_TIMEOUT_SECS: u64 = 120;

    /// Default timeout for external service fetches (seconds)
    pub const SERVICE_TIMEOUT_SECS: u64 = 30;

    /// Per-stage budget before the orchestrator treats the stage as a
    /// transport failure (seconds)
    pub const STAGE_TIMEOUT_SECS: u64 = 180;
}

/// Context collection constants
pub mod collection {
    /// Maximum incident records fetched per analysis, most recent first
    pub const MAX_INCIDENT_RECORDS: usize = 10;

    /// Forecast entries requested from the weather service
    pub const FORECAST_ENTRIES: usize = 4;
}

/// Pipeline stage constants
pub mod stages {
    /// Generation temperature per stage, carried from the original
    /// multi-agent workflow: precise validation, balanced risk scoring,
    /// creative incident prediction, structured synthesis.
    pub const VALIDATION_TEMPERATURE: f32 = 0.3;
    pub const RISK_TEMPERATURE: f32 = 0.7;
    pub const PREDICTION_TEMPERATURE: f32 = 1.0;
    pub const SYNTHESIS_TEMPERATURE: f32 = 0.5;

    /// Maximum output tokens for any stage
    pub const MAX_OUTPUT_TOKENS: usize = 12_000;
}

/// Scoring and banding constants
pub mod scoring {
    /// Quality score (0-10) at or above which data quality is HIGH
    pub const QUALITY_HIGH_MIN: f64 = 8.0;

    /// Quality score at or above which data quality is MEDIUM
    pub const QUALITY_MEDIUM_MIN: f64 = 5.0;

    /// Risk score (0-100) band floors
    pub const RISK_EXTREME_MIN: f64 = 95.0;
    pub const RISK_HIGH_MIN: f64 = 75.0;
    pub const RISK_MEDIUM_MIN: f64 = 50.0;
}

/// Version adapter safe defaults
pub mod defaults {
    /// Quality score substituted when a legacy report omits it
    pub const QUALITY_SCORE: f64 = 7.5;

    /// Incident probability (percent) substituted when absent
    pub const INCIDENT_PROBABILITY_PCT: f64 = 25.0;

    /// Overall risk score substituted when a legacy report omits it,
    /// landing in the MEDIUM band
    pub const RISK_SCORE: f64 = 50.0;

    /// Hazard probability (fraction) for the synthesized placeholder hazard
    pub const PLACEHOLDER_HAZARD_PROBABILITY: f64 = 0.5;

    /// Name of the hazard synthesized when a report carries none
    pub const PLACEHOLDER_HAZARD_NAME: &str = "General Safety Risk";

    /// Timeframe substituted when a legacy report omits one
    pub const INCIDENT_TIMEFRAME: &str = "1-6 months";
}

/// LLM provider constants
pub mod llm {
    /// Default Gemini model, matching the original application
    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

    /// Default Gemini API base
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
}
