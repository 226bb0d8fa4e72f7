//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/sitewarden/) and project (.sitewarden/) level
//! configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{collection, llm as llm_constants, network, retry};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Stage executor retry policy
    pub retry: RetryConfig,

    /// External collaborator endpoints
    pub services: ServiceConfig,

    /// Context collection settings
    pub collection: CollectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            retry: RetryConfig::default(),
            services: ServiceConfig::default(),
            collection: CollectionConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `WardenError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.llm.timeout_secs == 0 {
            return Err(crate::types::WardenError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(crate::types::WardenError::Config(
                "retry max_attempts must be at least 1".to_string(),
            ));
        }

        if self.retry.backoff_factor < 1.0 {
            return Err(crate::types::WardenError::Config(format!(
                "retry backoff_factor must be >= 1.0, got {}",
                self.retry.backoff_factor
            )));
        }

        for (name, endpoint) in [
            ("weather", &self.services.weather_base),
            ("site_info", &self.services.site_info_base),
            ("schedule", &self.services.schedule_base),
            ("incidents", &self.services.incidents_base),
            ("store", &self.services.store_base),
        ] {
            url::Url::parse(endpoint).map_err(|e| {
                crate::types::WardenError::Config(format!(
                    "services.{}_base is not a valid URL ({}): {}",
                    name, endpoint, e
                ))
            })?;
        }

        if self.collection.max_incidents == 0 {
            return Err(crate::types::WardenError::Config(
                "collection.max_incidents must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type: "gemini" or "mock"
    pub provider: String,

    /// Model name (provider-specific)
    pub model: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum output tokens per stage call
    pub max_output_tokens: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: Some(llm_constants::DEFAULT_GEMINI_MODEL.to_string()),
            api_base: None,
            timeout_secs: network::LLM_TIMEOUT_SECS,
            max_output_tokens: crate::constants::stages::MAX_OUTPUT_TOKENS,
        }
    }
}

// =============================================================================
// Retry Configuration
// =============================================================================

/// One uniform retry policy for every AI call site. Only transport
/// failures are retried; malformed output never is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u8,
    pub base_delay_ms: u64,
    pub max_delay_secs: u64,
    pub backoff_factor: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            base_delay_ms: retry::BASE_DELAY_MS,
            max_delay_secs: retry::MAX_DELAY_SECS,
            backoff_factor: retry::BACKOFF_FACTOR,
        }
    }
}

// =============================================================================
// Service Endpoints
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub weather_base: String,
    pub site_info_base: String,
    pub schedule_base: String,
    pub incidents_base: String,
    pub store_base: String,

    /// Timeout for external service fetches, seconds
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            weather_base: "https://api.weather.example.com/v1".to_string(),
            site_info_base: "https://api.sites.example.com/v1".to_string(),
            schedule_base: "https://api.schedule.example.com/v1".to_string(),
            incidents_base: "https://api.incidents.example.com/v1".to_string(),
            store_base: "https://api.store.example.com/v1".to_string(),
            timeout_secs: network::SERVICE_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Collection Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Maximum incident records fetched per analysis
    pub max_incidents: usize,

    /// Forecast entries requested from the weather service
    pub forecast_entries: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            max_incidents: collection::MAX_INCIDENT_RECORDS,
            forecast_entries: collection::FORECAST_ENTRIES,
        }
    }
}
