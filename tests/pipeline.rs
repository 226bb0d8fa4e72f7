//! End-to-end pipeline scenarios with an offline provider and in-memory
//! service fakes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::json;

use sitewarden::collect::ContextCollector;
use sitewarden::config::{CollectionConfig, RetryConfig};
use sitewarden::llm::{
    GenerationRequest, LlmProvider, LlmResponse, MockProvider, SharedProvider,
};
use sitewarden::pipeline::{AnalysisPipeline, FailureKind, PipelineStage, StageExecutor};
use sitewarden::services::{
    IncidentHistoryService, SiteInfoService, TaskScheduleService, WeatherService,
};
use sitewarden::types::{
    GoNoGo, IncidentRecord, Result, ScheduledTask, SiteLocation, WardenError, WeatherObservation,
};

// =============================================================================
// Service fakes
// =============================================================================

fn clear_weather() -> WeatherObservation {
    WeatherObservation {
        temperature_f: 68.0,
        humidity: 40.0,
        wind_speed_mph: 6.0,
        conditions: "Clear".to_string(),
        precipitation: false,
    }
}

struct FakeWeather;

#[async_trait]
impl WeatherService for FakeWeather {
    async fn current(&self, _lat: f64, _lon: f64) -> Result<WeatherObservation> {
        Ok(clear_weather())
    }

    async fn forecast(
        &self,
        _lat: f64,
        _lon: f64,
        entries: usize,
    ) -> Result<Vec<WeatherObservation>> {
        Ok(vec![clear_weather(); entries])
    }
}

struct FakeSiteInfo;

#[async_trait]
impl SiteInfoService for FakeSiteInfo {
    async fn site_info(&self, site_id: &str) -> Result<SiteLocation> {
        Ok(SiteLocation {
            name: format!("Site {}", site_id),
            address: "400 Quarry Ln".to_string(),
            latitude: 41.8,
            longitude: -87.6,
            site_type: "commercial-midrise".to_string(),
        })
    }
}

struct FakeSchedule {
    fail: bool,
}

#[async_trait]
impl TaskScheduleService for FakeSchedule {
    async fn scheduled_tasks(&self, _site_id: &str, _date: NaiveDate) -> Result<Vec<ScheduledTask>> {
        if self.fail {
            return Err(WardenError::service("schedule", "connection refused"));
        }
        Ok(vec![ScheduledTask {
            task_type: "Masonry".to_string(),
            description: "Block wall on level 2".to_string(),
            crew_size: Some(5),
        }])
    }
}

struct FakeIncidents;

#[async_trait]
impl IncidentHistoryService for FakeIncidents {
    async fn recent_incidents(&self, _site_type: &str, _limit: usize) -> Result<Vec<IncidentRecord>> {
        Ok(vec![IncidentRecord {
            description: "Scaffold plank slipped during loading".to_string(),
            severity: "Minor".to_string(),
            occurred_at: Utc::now(),
        }])
    }
}

// =============================================================================
// Provider wrappers
// =============================================================================

/// Counts calls and delegates to the canned mock provider
struct CountingProvider {
    inner: MockProvider,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl LlmProvider for CountingProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.generate(request).await
    }

    fn name(&self) -> &str {
        "counting-mock"
    }

    fn model(&self) -> &str {
        "mock"
    }
}

/// Returns garbage for the risk-assessment stage, delegates otherwise.
/// Counts how many times the risk stage was attempted.
struct BrokenRiskStageProvider {
    inner: MockProvider,
    risk_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl LlmProvider for BrokenRiskStageProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse> {
        let is_risk_stage = request
            .schema
            .get("properties")
            .is_some_and(|p| p.get("hazards").is_some());
        if is_risk_stage {
            self.risk_calls.fetch_add(1, Ordering::SeqCst);
            return Ok(LlmResponse {
                text: "Sorry, I can only answer in prose today.".to_string(),
                usage: Default::default(),
                elapsed_ms: 1,
                metadata: Default::default(),
            });
        }
        self.inner.generate(request).await
    }

    fn name(&self) -> &str {
        "broken-risk"
    }

    fn model(&self) -> &str {
        "mock"
    }
}

/// Fails with a transient error a fixed number of times, then delegates
struct FlakyTransportProvider {
    inner: MockProvider,
    calls: Arc<AtomicUsize>,
    failures: usize,
}

#[async_trait]
impl LlmProvider for FlakyTransportProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(WardenError::Llm(
                sitewarden::types::LlmError::with_provider(
                    sitewarden::types::ErrorCategory::Transient,
                    "503 service unavailable",
                    "flaky",
                ),
            ));
        }
        self.inner.generate(request).await
    }

    fn name(&self) -> &str {
        "flaky"
    }

    fn model(&self) -> &str {
        "mock"
    }
}

// =============================================================================
// Wiring
// =============================================================================

fn collector(schedule_fail: bool) -> ContextCollector {
    ContextCollector::new(
        Arc::new(FakeWeather),
        Arc::new(FakeSiteInfo),
        Arc::new(FakeSchedule {
            fail: schedule_fail,
        }),
        Arc::new(FakeIncidents),
        &CollectionConfig::default(),
    )
}

fn pipeline(provider: SharedProvider, schedule_fail: bool) -> AnalysisPipeline {
    let executor = StageExecutor::new(
        provider,
        RetryConfig {
            max_attempts: 3,
            base_delay_ms: 1,
            max_delay_secs: 1,
            backoff_factor: 2.0,
        },
        Duration::from_secs(5),
    );
    AnalysisPipeline::new(collector(schedule_fail), executor, 12_000)
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn clear_day_produces_go_report() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = Arc::new(CountingProvider {
        inner: MockProvider::new(),
        calls: calls.clone(),
    });

    let report = pipeline(provider, false).run("site-9").await.unwrap();

    assert!(matches!(
        report.synthesis.decision.decision,
        GoNoGo::Go | GoNoGo::ConditionalGo
    ));
    // Exactly one model call per analysis stage
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert!(!report.risk_assessment.hazards.is_empty());
    assert!(!report.incident_prediction.causal_chain.is_empty());
    assert_eq!(report.metadata.work_type, "Masonry");
    assert_eq!(report.pipeline.models_used.len(), 4);
    // Probability renders on the percent scale
    assert_eq!(report.incident_prediction.probability.to_string(), "8%");
}

#[tokio::test]
async fn required_fetch_failure_stops_before_any_stage() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = Arc::new(CountingProvider {
        inner: MockProvider::new(),
        calls: calls.clone(),
    });

    let failure = pipeline(provider, true).run("site-9").await.unwrap_err();

    assert_eq!(failure.stage, PipelineStage::CollectingContext);
    assert_eq!(failure.kind, FailureKind::Collection);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "no stage may run without context");
}

#[tokio::test]
async fn malformed_stage_output_fails_without_retry() {
    let risk_calls = Arc::new(AtomicUsize::new(0));
    let provider = Arc::new(BrokenRiskStageProvider {
        inner: MockProvider::new(),
        risk_calls: risk_calls.clone(),
    });

    let failure = pipeline(provider, false).run("site-9").await.unwrap_err();

    assert_eq!(failure.stage, PipelineStage::AssessingRisk);
    assert_eq!(failure.kind, FailureKind::Parse);
    assert_eq!(
        risk_calls.load(Ordering::SeqCst),
        1,
        "malformed output must not be retried"
    );
    assert!(matches!(failure.error, WardenError::MalformedOutput { .. }));
}

#[tokio::test]
async fn transient_transport_failures_are_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = Arc::new(FlakyTransportProvider {
        inner: MockProvider::new(),
        calls: calls.clone(),
        failures: 2,
    });

    let report = pipeline(provider, false).run("site-9").await.unwrap();

    // Two failed attempts on the first stage, then 4 successful stage calls
    assert_eq!(calls.load(Ordering::SeqCst), 6);
    assert!(!report.risk_assessment.hazards.is_empty());
}

#[tokio::test]
async fn transport_failure_exhausting_attempts_fails_the_stage() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = Arc::new(FlakyTransportProvider {
        inner: MockProvider::new(),
        calls: calls.clone(),
        failures: 99,
    });

    let failure = pipeline(provider, false).run("site-9").await.unwrap_err();

    assert_eq!(failure.stage, PipelineStage::Validating);
    assert_eq!(failure.kind, FailureKind::Transport);
    assert_eq!(calls.load(Ordering::SeqCst), 3, "bounded by max_attempts");
}

#[tokio::test]
async fn report_serializes_with_all_concern_buckets() {
    let report = pipeline(Arc::new(MockProvider::new()), false)
        .run("site-9")
        .await
        .unwrap();

    let value = serde_json::to_value(&report).unwrap();
    let concerns = &value["validation"]["concerns"];
    for bucket in ["CRITICAL", "HIGH", "MEDIUM", "LOW"] {
        assert!(concerns[bucket].is_array(), "missing bucket {bucket}");
    }
    assert_eq!(value["incident_prediction"]["probability"], json!(8.0));
}
