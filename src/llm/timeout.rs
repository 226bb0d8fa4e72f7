//! Timeout Helpers
//!
//! Every external call gets a bounded wait; exceeding it surfaces as a
//! timeout error the caller treats as a transport failure, never as an
//! infinite hang.

use std::future::Future;
use std::time::Duration;

use crate::constants::network;
use crate::types::{Result, WardenError};

/// Timeout configuration for external operations
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Timeout for LLM API requests
    pub llm_request: Duration,
    /// Timeout for weather/site/schedule/incident fetches
    pub service_fetch: Duration,
    /// Overall budget for one pipeline stage
    pub stage: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            llm_request: Duration::from_secs(network::LLM_TIMEOUT_SECS),
            service_fetch: Duration::from_secs(network::SERVICE_TIMEOUT_SECS),
            stage: Duration::from_secs(network::STAGE_TIMEOUT_SECS),
        }
    }
}

/// Execute an async operation with a timeout.
///
/// Returns a timeout error if the operation doesn't complete within the
/// specified duration.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(WardenError::timeout(operation_name, timeout)),
    }
}
