//! Core domain types: site context, report data model, errors, units.

pub mod context;
pub mod error;
pub mod report;
pub mod units;

pub use context::{
    IncidentRecord, ScheduledTask, SiteContext, SiteLocation, WeatherObservation,
};
pub use error::{ErrorCategory, ErrorClassifier, LlmError, Result, WardenError};
pub use report::{
    CausalStage, ConcernBuckets, ConsequenceSeverity, DataQuality, DecisionBasis, GoNoGo,
    GoNoGoDecision, Hazard, HazardCategory, IncidentPredictionOutput, IndicatorType,
    InsufficientResponse, InterventionTier, Interventions, LeadingIndicator,
    MitigativeIntervention, PipelineMetadata, PreventiveIntervention, Rating, RecommendedAction,
    ReportMetadata, RiskAssessmentOutput, RiskLevel, RiskSummary, SafetyReport, SynthesisOutput,
    ValidationOutput, WeatherSeverity,
};
pub use units::Percentage;
