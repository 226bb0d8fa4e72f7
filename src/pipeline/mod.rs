//! Analysis Pipeline
//!
//! The four-stage orchestrator: collect context, validate it, assess risk,
//! predict the most likely incident, then synthesize the Go/No-Go decision.
//! Stages run strictly in order; each consumes the typed output of the
//! stages before it. A failed stage fails the run with a diagnostic naming
//! the stage and the failure class.

pub mod executor;
pub mod prompts;
pub mod schemas;

pub use executor::{StageExecutor, StageResult};

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::collect::ContextCollector;
use crate::constants::stages;
use crate::services::shared_store;
use crate::types::{
    GoNoGo, IncidentPredictionOutput, PipelineMetadata, ReportMetadata,
    RiskAssessmentOutput, SafetyReport, SiteContext, SynthesisOutput, ValidationOutput,
    WardenError,
};

/// Pipeline version stamped into report metadata
const PIPELINE_VERSION: &str = "2.0";

/// Where a run is, or where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    CollectingContext,
    Validating,
    AssessingRisk,
    PredictingIncident,
    Synthesizing,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CollectingContext => "COLLECTING_CONTEXT",
            Self::Validating => "VALIDATING",
            Self::AssessingRisk => "ASSESSING_RISK",
            Self::PredictingIncident => "PREDICTING_INCIDENT",
            Self::Synthesizing => "SYNTHESIZING",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure class attached to a failed run's diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A required context fetch failed
    Collection,
    /// Transport to the model or a service failed after retries
    Transport,
    /// The model answered but its output could not be decoded
    Parse,
}

impl FailureKind {
    fn from_error(error: &WardenError) -> Self {
        match error {
            WardenError::Collection { .. } => Self::Collection,
            WardenError::MalformedOutput { .. } | WardenError::Json(_) => Self::Parse,
            _ => Self::Transport,
        }
    }
}

/// Diagnostic record for a failed run: which stage stopped the pipeline,
/// what class of failure it was, and the underlying error.
#[derive(Debug)]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    pub kind: FailureKind,
    pub error: WardenError,
}

impl std::fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pipeline failed at {} ({:?}): {}",
            self.stage, self.kind, self.error
        )
    }
}

impl std::error::Error for PipelineFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

pub struct AnalysisPipeline {
    collector: ContextCollector,
    executor: StageExecutor,
    max_output_tokens: usize,
}

impl AnalysisPipeline {
    pub fn new(
        collector: ContextCollector,
        executor: StageExecutor,
        max_output_tokens: usize,
    ) -> Self {
        Self {
            collector,
            executor,
            max_output_tokens,
        }
    }

    /// Run the full pipeline for a site and return the assembled report.
    pub async fn run(&self, site_id: &str) -> Result<SafetyReport, PipelineFailure> {
        let started = Instant::now();
        let mut models_used = BTreeMap::new();

        info!(site_id, stage = %PipelineStage::CollectingContext, "starting analysis");
        let ctx = self
            .collector
            .collect(site_id)
            .await
            .map_err(|e| fail(PipelineStage::CollectingContext, e))?;

        info!(site_id, stage = %PipelineStage::Validating, "context collected");
        let validation = self
            .validate(&ctx, &mut models_used)
            .await
            .map_err(|e| fail(PipelineStage::Validating, e))?;

        info!(
            site_id,
            stage = %PipelineStage::AssessingRisk,
            quality_score = validation.quality_score,
            "validation complete"
        );
        let risk = self
            .assess_risk(&ctx, &validation, &mut models_used)
            .await
            .map_err(|e| fail(PipelineStage::AssessingRisk, e))?;

        info!(
            site_id,
            stage = %PipelineStage::PredictingIncident,
            hazards = risk.hazards.len(),
            highest_risk = risk.risk_summary.highest_risk_score,
            "risk assessment complete"
        );
        let prediction = self
            .predict_incident(&ctx, &risk, &mut models_used)
            .await
            .map_err(|e| fail(PipelineStage::PredictingIncident, e))?;

        info!(
            site_id,
            stage = %PipelineStage::Synthesizing,
            incident = %prediction.incident_name,
            "incident prediction complete"
        );
        let synthesis = self
            .synthesize(&ctx, &validation, &risk, &prediction, &mut models_used)
            .await
            .map_err(|e| fail(PipelineStage::Synthesizing, e))?;

        let report = SafetyReport {
            metadata: ReportMetadata {
                report_id: Uuid::new_v4().to_string(),
                generated_at: Utc::now(),
                project_name: ctx.location.name.clone(),
                location: ctx.location.address.clone(),
                work_type: ctx.work_type().to_string(),
                supervisor: "Unassigned".to_string(),
            },
            validation,
            risk_assessment: risk,
            incident_prediction: prediction,
            synthesis,
            pipeline: PipelineMetadata {
                version: PIPELINE_VERSION.to_string(),
                execution_time_ms: started.elapsed().as_millis() as u64,
                models_used,
            },
        };

        info!(
            site_id,
            report_id = %report.metadata.report_id,
            decision = ?report.synthesis.decision.decision,
            elapsed_ms = report.pipeline.execution_time_ms,
            "analysis complete"
        );

        persist_report(&report);
        Ok(report)
    }

    async fn validate(
        &self,
        ctx: &SiteContext,
        models: &mut BTreeMap<String, String>,
    ) -> crate::types::Result<ValidationOutput> {
        let result = self
            .executor
            .execute::<ValidationOutput>(
                "validation",
                &ctx.site_id,
                prompts::validation(ctx),
                schemas::validation(),
                stages::VALIDATION_TEMPERATURE,
                self.max_output_tokens,
            )
            .await?;
        models.insert("validation".to_string(), result.model);
        Ok(result.output)
    }

    async fn assess_risk(
        &self,
        ctx: &SiteContext,
        validation: &ValidationOutput,
        models: &mut BTreeMap<String, String>,
    ) -> crate::types::Result<RiskAssessmentOutput> {
        let result = self
            .executor
            .execute::<RiskAssessmentOutput>(
                "risk_assessment",
                &ctx.site_id,
                prompts::risk_assessment(ctx, validation),
                schemas::risk_assessment(),
                stages::RISK_TEMPERATURE,
                self.max_output_tokens,
            )
            .await?;
        models.insert("risk_assessment".to_string(), result.model);
        Ok(result.output.normalize())
    }

    async fn predict_incident(
        &self,
        ctx: &SiteContext,
        risk: &RiskAssessmentOutput,
        models: &mut BTreeMap<String, String>,
    ) -> crate::types::Result<IncidentPredictionOutput> {
        let result = self
            .executor
            .execute::<IncidentPredictionOutput>(
                "incident_prediction",
                &ctx.site_id,
                prompts::incident_prediction(ctx, risk),
                schemas::incident_prediction(),
                stages::PREDICTION_TEMPERATURE,
                self.max_output_tokens,
            )
            .await?;
        models.insert("incident_prediction".to_string(), result.model);
        Ok(result.output.normalize())
    }

    async fn synthesize(
        &self,
        ctx: &SiteContext,
        validation: &ValidationOutput,
        risk: &RiskAssessmentOutput,
        prediction: &IncidentPredictionOutput,
        models: &mut BTreeMap<String, String>,
    ) -> crate::types::Result<SynthesisOutput> {
        let result = self
            .executor
            .execute_raw(
                "synthesis",
                &ctx.site_id,
                prompts::synthesis(ctx, validation, risk, prediction),
                schemas::synthesis(),
                stages::SYNTHESIS_TEMPERATURE,
                self.max_output_tokens,
            )
            .await?;
        models.insert("synthesis".to_string(), result.model);
        decode_synthesis(result.output)
    }
}

fn fail(stage: PipelineStage, error: WardenError) -> PipelineFailure {
    let kind = FailureKind::from_error(&error);
    warn!(stage = %stage, kind = ?kind, error = %error, "pipeline stage failed");
    PipelineFailure { stage, kind, error }
}

/// Decode the synthesis stage's raw JSON, mapping the decision string
/// through the conservative canonical table first so a producer variant
/// like GO_WITH_CONDITIONS decodes instead of erroring.
fn decode_synthesis(mut value: serde_json::Value) -> crate::types::Result<SynthesisOutput> {
    if let Some(raw) = value
        .pointer("/decision/decision")
        .and_then(|d| d.as_str())
        .map(str::to_string)
    {
        let canonical = serde_json::to_value(GoNoGo::from_raw(&raw))?;
        if let Some(slot) = value.pointer_mut("/decision/decision") {
            *slot = canonical;
        }
    }

    let raw = value.to_string();
    serde_json::from_value(value).map_err(|e| {
        WardenError::malformed(
            "synthesis",
            format!("decoded JSON does not match stage shape: {}", e),
            raw,
        )
    })
}

/// Fire-and-forget report persistence through the shared analysis store
fn persist_report(report: &SafetyReport) {
    let Some(store) = shared_store() else {
        return;
    };
    let report = report.clone();
    tokio::spawn(async move {
        if let Err(e) = store.save_report(&report).await {
            warn!(report_id = %report.metadata.report_id, error = %e, "report persistence failed");
        }
    });
}
