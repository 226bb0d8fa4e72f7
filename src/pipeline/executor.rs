//! Stage Executor
//!
//! Runs one generation request against the provider with timeout, retry,
//! and history logging. Retries apply to transport failures only; output
//! that arrives but cannot be decoded is a producer bug and is surfaced
//! immediately.

use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::llm::{GenerationRequest, LlmResponse, SharedProvider, extract_json, with_timeout};
use crate::services::{AnalysisRecord, shared_store};
use crate::types::{Result, WardenError};

/// Decoded stage output plus the execution record the orchestrator folds
/// into the report's pipeline metadata.
#[derive(Debug)]
pub struct StageResult<T> {
    pub output: T,
    pub model: String,
    pub elapsed_ms: u64,
}

pub struct StageExecutor {
    provider: SharedProvider,
    retry: RetryConfig,
    request_timeout: Duration,
}

impl StageExecutor {
    pub fn new(provider: SharedProvider, retry: RetryConfig, request_timeout: Duration) -> Self {
        Self {
            provider,
            retry,
            request_timeout,
        }
    }

    /// Execute one stage call and decode the response into `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        stage: &'static str,
        site_id: &str,
        prompt: String,
        schema: Value,
        temperature: f32,
        max_output_tokens: usize,
    ) -> Result<StageResult<T>> {
        let result = self
            .execute_raw(stage, site_id, prompt, schema, temperature, max_output_tokens)
            .await?;
        let raw = result.output.to_string();
        let output = serde_json::from_value(result.output).map_err(|e| {
            WardenError::malformed(
                stage,
                format!("decoded JSON does not match stage shape: {}", e),
                raw,
            )
        })?;
        Ok(StageResult {
            output,
            model: result.model,
            elapsed_ms: result.elapsed_ms,
        })
    }

    /// Execute one stage call, returning the extracted JSON object without
    /// typed decoding. The synthesis stage uses this to normalize the
    /// decision string before decoding.
    pub async fn execute_raw(
        &self,
        stage: &'static str,
        site_id: &str,
        prompt: String,
        schema: Value,
        temperature: f32,
        max_output_tokens: usize,
    ) -> Result<StageResult<Value>> {
        let request = GenerationRequest {
            prompt,
            schema,
            temperature,
            max_output_tokens,
        };

        let response = self.generate_with_retry(stage, &request).await?;
        self.log_history(stage, site_id, &request, &response);

        let value = extract_json(stage, &response.text)?;
        Ok(StageResult {
            output: value,
            model: response.metadata.model,
            elapsed_ms: response.elapsed_ms,
        })
    }

    /// Transport loop: bounded attempts with exponential backoff and
    /// jitter. Only recoverable errors (classified transport failures and
    /// timeouts) are retried.
    async fn generate_with_retry(
        &self,
        stage: &'static str,
        request: &GenerationRequest,
    ) -> Result<LlmResponse> {
        let max_attempts = self.retry.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let result = with_timeout(
                self.request_timeout,
                self.provider.generate(request),
                stage,
            )
            .await;

            match result {
                Ok(response) => {
                    debug!(
                        stage,
                        attempt,
                        elapsed_ms = response.elapsed_ms,
                        tokens = response.usage.total(),
                        "stage call completed"
                    );
                    return Ok(response);
                }
                Err(e) if e.is_recoverable() && attempt < max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        stage,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient stage failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }

        // max_attempts >= 1, so the loop always returns before this
        Err(WardenError::Config("retry loop exhausted".to_string()))
    }

    fn backoff_delay(&self, attempt: u8) -> Duration {
        let factor = f64::from(self.retry.backoff_factor.max(1.0));
        let base = self.retry.base_delay_ms as f64;
        let scaled = base * factor.powi(i32::from(attempt) - 1);
        let capped = scaled.min((self.retry.max_delay_secs * 1000) as f64);
        let jitter = rand::random_range(0.0..=capped * 0.25);
        Duration::from_millis((capped + jitter) as u64)
    }

    /// Fire-and-forget history write. A store failure never fails a stage.
    fn log_history(
        &self,
        stage: &'static str,
        site_id: &str,
        request: &GenerationRequest,
        response: &LlmResponse,
    ) {
        let Some(store) = shared_store() else {
            return;
        };
        let record = AnalysisRecord {
            site_id: site_id.to_string(),
            stage: stage.to_string(),
            query: request.prompt.clone(),
            response: response.text.clone(),
            model: response.metadata.model.clone(),
            created_at: Utc::now(),
        };
        tokio::spawn(async move {
            if let Err(e) = store.save_analysis(&record).await {
                warn!(stage = %record.stage, error = %e, "analysis history write failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::llm::{LlmProvider, ResponseMetadata};
    use crate::types::{ErrorCategory, LlmError};

    struct FlakyProvider {
        calls: Arc<AtomicUsize>,
        failures_before_success: usize,
        body: String,
    }

    #[async_trait]
    impl LlmProvider for FlakyProvider {
        async fn generate(&self, _request: &GenerationRequest) -> Result<LlmResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                return Err(WardenError::Llm(LlmError::with_provider(
                    ErrorCategory::Network,
                    "connection reset",
                    "fake",
                )));
            }
            Ok(LlmResponse {
                text: self.body.clone(),
                usage: Default::default(),
                elapsed_ms: 5,
                metadata: ResponseMetadata {
                    model: "fake-model".to_string(),
                    provider: "fake".to_string(),
                },
            })
        }

        fn name(&self) -> &str {
            "fake"
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }

    fn executor(provider: FlakyProvider) -> StageExecutor {
        StageExecutor::new(
            Arc::new(provider),
            RetryConfig {
                max_attempts: 3,
                base_delay_ms: 1,
                max_delay_secs: 1,
                backoff_factor: 2.0,
            },
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_transport_failure_retried_until_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let exec = executor(FlakyProvider {
            calls: calls.clone(),
            failures_before_success: 2,
            body: r#"{"value": 1}"#.to_string(),
        });

        let result = exec
            .execute_raw("test_stage", "site-1", "p".into(), json!({}), 0.5, 100)
            .await
            .unwrap();
        assert_eq!(result.output, json!({"value": 1}));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transport_failure_exhausts_attempts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let exec = executor(FlakyProvider {
            calls: calls.clone(),
            failures_before_success: 10,
            body: String::new(),
        });

        let err = exec
            .execute_raw("test_stage", "site-1", "p".into(), json!({}), 0.5, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, WardenError::Llm(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_malformed_output_never_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let exec = executor(FlakyProvider {
            calls: calls.clone(),
            failures_before_success: 0,
            body: "I cannot answer in JSON today.".to_string(),
        });

        let err = exec
            .execute_raw("test_stage", "site-1", "p".into(), json!({}), 0.5, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, WardenError::MalformedOutput { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_delays_strictly_increase_below_cap() {
        let exec = StageExecutor::new(
            Arc::new(FlakyProvider {
                calls: Arc::new(AtomicUsize::new(0)),
                failures_before_success: 0,
                body: String::new(),
            }),
            RetryConfig {
                max_attempts: 5,
                base_delay_ms: 100,
                max_delay_secs: 60,
                backoff_factor: 2.0,
            },
            Duration::from_secs(5),
        );

        // Jitter adds at most 25% of the capped delay, so with a doubling
        // factor each delay is strictly above the previous one.
        let delays: Vec<Duration> = (1..=4).map(|a| exec.backoff_delay(a)).collect();
        for pair in delays.windows(2) {
            assert!(pair[1] > pair[0], "delays must strictly increase: {:?}", delays);
        }
        assert!(delays[0] >= Duration::from_millis(100));
        assert!(delays[0] <= Duration::from_millis(125));
    }

    #[test]
    fn test_backoff_delay_respects_cap() {
        let exec = StageExecutor::new(
            Arc::new(FlakyProvider {
                calls: Arc::new(AtomicUsize::new(0)),
                failures_before_success: 0,
                body: String::new(),
            }),
            RetryConfig {
                max_attempts: 10,
                base_delay_ms: 500,
                max_delay_secs: 1,
                backoff_factor: 2.0,
            },
            Duration::from_secs(5),
        );

        let delay = exec.backoff_delay(9);
        assert!(delay <= Duration::from_millis(1250));
    }

    #[tokio::test]
    async fn test_typed_decode_mismatch_is_malformed() {
        let exec = executor(FlakyProvider {
            calls: Arc::new(AtomicUsize::new(0)),
            failures_before_success: 0,
            body: r#"{"unexpected": true}"#.to_string(),
        });

        #[derive(Debug, serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            value: u32,
        }

        let err = exec
            .execute::<Expected>("test_stage", "site-1", "p".into(), json!({}), 0.5, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, WardenError::MalformedOutput { .. }));
    }
}
