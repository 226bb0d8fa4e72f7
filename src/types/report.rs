//! Canonical Report Data Model
//!
//! Typed shapes for the four analysis stages and the assembled safety
//! report. This is the one shape the UI boundary consumes; the version
//! adapter normalizes alternate producer shapes into it.
//!
//! Two invariants are enforced structurally rather than by convention:
//! concern buckets are a struct with all four severity fields (a bucket can
//! be empty but never absent), and incident probability is a [`Percentage`]
//! so the percent-vs-fraction scale travels with the value.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{defaults, scoring};
use crate::types::units::Percentage;

// =============================================================================
// Stage 1: Validation
// =============================================================================

/// Banded data-quality rating derived from the quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQuality {
    High,
    Medium,
    Low,
}

impl DataQuality {
    /// Band a 0-10 quality score
    pub fn from_score(score: f64) -> Self {
        if score >= scoring::QUALITY_HIGH_MIN {
            Self::High
        } else if score >= scoring::QUALITY_MEDIUM_MIN {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Recommended action from the validation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    Proceed,
    RequestClarification,
    RejectUnsafe,
}

/// A checklist field whose response exists but is too thin to analyze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficientResponse {
    pub field: String,
    pub issue: String,
}

/// Severity-bucketed validation concerns.
///
/// All four buckets are always present; consumers may rely on every key
/// existing even when its list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcernBuckets {
    #[serde(rename = "CRITICAL", default)]
    pub critical: Vec<String>,
    #[serde(rename = "HIGH", default)]
    pub high: Vec<String>,
    #[serde(rename = "MEDIUM", default)]
    pub medium: Vec<String>,
    #[serde(rename = "LOW", default)]
    pub low: Vec<String>,
}

impl ConcernBuckets {
    pub fn is_empty(&self) -> bool {
        self.critical.is_empty() && self.high.is_empty() && self.medium.is_empty() && self.low.is_empty()
    }
}

/// Output of the data-validation stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutput {
    /// Quality score in [0, 10]
    pub quality_score: f64,
    pub data_quality: DataQuality,
    /// Named critical fields that are missing or inadequate
    pub missing_critical: Vec<String>,
    #[serde(default)]
    pub insufficient_responses: Vec<InsufficientResponse>,
    pub concerns: ConcernBuckets,
    pub recommended_action: RecommendedAction,
}

// =============================================================================
// Stage 2: Risk Assessment
// =============================================================================

/// OSHA Fatal Four hazard categories plus a catch-all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardCategory {
    Falls,
    #[serde(rename = "Struck-By")]
    StruckBy,
    Electrocution,
    #[serde(rename = "Caught-Between")]
    CaughtBetween,
    Other,
}

/// Consequence severity of a hazard if it materializes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsequenceSeverity {
    Fatal,
    Critical,
    Serious,
    Minor,
}

impl ConsequenceSeverity {
    /// Severity multiplier used in the risk-score formula
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Fatal => 10.0,
            Self::Critical => 7.0,
            Self::Serious => 4.0,
            Self::Minor => 1.0,
        }
    }
}

/// Risk level band derived from the 0-100 risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Extreme,
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= scoring::RISK_EXTREME_MIN {
            Self::Extreme
        } else if score >= scoring::RISK_HIGH_MIN {
            Self::High
        } else if score >= scoring::RISK_MEDIUM_MIN {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One identified hazard with its quantitative assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub name: String,
    pub category: HazardCategory,
    /// Occurrence probability as a [0, 1] fraction.
    ///
    /// This is the only probability in the model that is a fraction; it
    /// feeds the risk-score formula and is never rendered directly.
    pub probability: f64,
    pub consequence: ConsequenceSeverity,
    /// Risk score in [0, 100]: probability x 100 x severity multiplier, capped
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Free-text regulatory context (applicable standards, citations)
    pub regulatory_context: String,
    pub inadequate_controls: Vec<String>,
    pub recommended_controls: Vec<String>,
}

impl Hazard {
    /// Compute the capped risk score from probability and consequence
    pub fn score(probability: f64, consequence: ConsequenceSeverity) -> f64 {
        (probability.clamp(0.0, 1.0) * 100.0 * consequence.multiplier()).min(100.0)
    }

    /// The placeholder hazard synthesized when a producer reports none.
    /// Downstream rendering assumes at least one hazard exists.
    pub fn placeholder(risk_score: f64) -> Self {
        Self {
            name: defaults::PLACEHOLDER_HAZARD_NAME.to_string(),
            category: HazardCategory::Other,
            probability: defaults::PLACEHOLDER_HAZARD_PROBABILITY,
            consequence: ConsequenceSeverity::Serious,
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            regulatory_context: "General industry standards apply".to_string(),
            inadequate_controls: vec![],
            recommended_controls: vec!["Follow standard safety procedures".to_string()],
        }
    }
}

/// Top-level summary across all hazards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub overall_risk_level: RiskLevel,
    pub highest_risk_score: f64,
    pub industry_context: String,
}

/// Output of the risk-assessment stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentOutput {
    pub risk_summary: RiskSummary,
    /// Never empty: a producer reporting zero hazards gets one placeholder
    pub hazards: Vec<Hazard>,
    /// Headline threats for the executive summary
    pub top_threats: Vec<String>,
}

impl RiskAssessmentOutput {
    /// Restore invariants after decoding an external producer's output:
    /// hazards non-empty, summary consistent with the hazard list.
    pub fn normalize(mut self) -> Self {
        if self.hazards.is_empty() {
            self.hazards
                .push(Hazard::placeholder(self.risk_summary.highest_risk_score));
        }
        let highest = self
            .hazards
            .iter()
            .map(|h| h.risk_score)
            .fold(self.risk_summary.highest_risk_score, f64::max);
        self.risk_summary.highest_risk_score = highest;
        self
    }
}

// =============================================================================
// Stage 3: Incident Prediction
// =============================================================================

/// Confidence / feasibility / cost band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    High,
    Medium,
    Low,
}

/// One failed defensive layer in the causal chain (Swiss-cheese model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalStage {
    pub stage: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_intervene: Option<String>,
}

impl CausalStage {
    /// Placeholder stage substituted when a producer omits the chain
    pub fn placeholder() -> Self {
        Self {
            stage: "Initial Condition".to_string(),
            description: "Causal chain unavailable from producer".to_string(),
            evidence: Some("Multi-stage pipeline output".to_string()),
            why: None,
            severity: None,
            time_to_intervene: None,
        }
    }
}

/// Category of an observable precursor condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorType {
    Behavioral,
    Environmental,
    Organizational,
    #[serde(rename = "Near-Miss")]
    NearMiss,
}

/// An observable precursor condition worth monitoring today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadingIndicator {
    pub indicator_type: IndicatorType,
    pub where_to_look: String,
    pub what_to_see: String,
    pub threshold: String,
    pub action_required: String,
}

/// Hierarchy-of-controls tier for preventive interventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterventionTier {
    Elimination,
    Engineering,
    Administrative,
    #[serde(rename = "PPE")]
    Ppe,
}

/// An intervention that breaks the causal chain before the incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreventiveIntervention {
    pub tier: InterventionTier,
    pub action: String,
    pub feasibility: Rating,
    pub cost: Rating,
    pub time_to_implement: String,
    /// Expected risk reduction, free text ("50-75%")
    pub effectiveness: String,
}

/// An intervention that reduces harm once the incident occurs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigativeIntervention {
    pub action: String,
    pub reduces_harm: String,
}

/// Preventive and mitigative interventions plus the recommended approach
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interventions {
    #[serde(default)]
    pub preventive: Vec<PreventiveIntervention>,
    #[serde(default)]
    pub mitigative: Vec<MitigativeIntervention>,
    #[serde(default)]
    pub recommended: String,
}

/// Output of the incident-prediction stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentPredictionOutput {
    pub incident_name: String,
    pub timeframe: String,
    /// Probability as a percentage in [0, 100], never a fraction
    pub probability: Percentage,
    pub confidence: Rating,
    /// Ordered causal chain, never empty after normalization
    pub causal_chain: Vec<CausalStage>,
    #[serde(default)]
    pub leading_indicators: Vec<LeadingIndicator>,
    #[serde(default)]
    pub interventions: Interventions,
}

impl IncidentPredictionOutput {
    /// Restore invariants after decoding: the causal chain is never empty
    pub fn normalize(mut self) -> Self {
        if self.causal_chain.is_empty() {
            self.causal_chain.push(CausalStage::placeholder());
        }
        self
    }
}

// =============================================================================
// Stage 4: Synthesis
// =============================================================================

/// Final categorical recommendation, four levels of increasing restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoNoGo {
    Go,
    ConditionalGo,
    NoGo,
    StopWork,
}

impl GoNoGo {
    /// Map a producer's decision string onto the canonical enumeration.
    ///
    /// Unrecognized values map to [`GoNoGo::NoGo`]: a malformed decision is
    /// never interpreted as permission to proceed.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "GO" => Self::Go,
            "CONDITIONAL_GO" | "GO_WITH_CONDITIONS" => Self::ConditionalGo,
            "NO_GO" => Self::NoGo,
            "STOP_WORK" => Self::StopWork,
            _ => Self::NoGo,
        }
    }
}

/// Weather severity band feeding the decision basis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeatherSeverity {
    Normal,
    Elevated,
    Extreme,
}

/// Quantitative inputs the Go/No-Go decision was based on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionBasis {
    pub highest_risk_score: f64,
    pub critical_gaps_count: usize,
    pub weather_severity: WeatherSeverity,
    pub regulatory_violations: usize,
    pub emergency_readiness: bool,
}

/// The executive decision record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoNoGoDecision {
    pub decision: GoNoGo,
    pub basis: DecisionBasis,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_restriction: Option<String>,
}

/// Output of the synthesis stage: the decision plus denormalized
/// convenience fields for direct UI consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisOutput {
    pub decision: GoNoGoDecision,
    pub overall_risk_level: RiskLevel,
    pub incident_probability: Percentage,
    pub top_threats: Vec<String>,
    pub critical_actions: Vec<String>,
}

// =============================================================================
// Assembled Report
// =============================================================================

/// Report identity and provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub project_name: String,
    pub location: String,
    pub work_type: String,
    pub supervisor: String,
}

/// Pipeline execution record attached to successful runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub version: String,
    pub execution_time_ms: u64,
    /// Stage name -> model that produced it (BTreeMap for stable equality)
    #[serde(default)]
    pub models_used: BTreeMap<String, String>,
}

/// The canonical completed report handed to the UI and the analysis store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub metadata: ReportMetadata,
    pub validation: ValidationOutput,
    pub risk_assessment: RiskAssessmentOutput,
    pub incident_prediction: IncidentPredictionOutput,
    pub synthesis: SynthesisOutput,
    #[serde(default)]
    pub pipeline: PipelineMetadata,
}
