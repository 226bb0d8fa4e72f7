//! Report Rendering
//!
//! Turns a canonical [`SafetyReport`] into the two consumable forms: a
//! pretty JSON document for machine consumers and a plain-text briefing for
//! the site trailer. All probabilities render through [`Percentage`]'s
//! Display, so the percent scale is fixed at one place.

pub mod findings;

use std::fmt::Write as _;

use crate::types::{GoNoGo, Result, SafetyReport};

/// Pretty JSON export of the full canonical report
pub fn to_json(report: &SafetyReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One-paragraph executive summary: decision, risk level, incident outlook
pub fn executive_summary(report: &SafetyReport) -> String {
    let decision = match report.synthesis.decision.decision {
        GoNoGo::Go => "GO",
        GoNoGo::ConditionalGo => "CONDITIONAL GO",
        GoNoGo::NoGo => "NO GO",
        GoNoGo::StopWork => "STOP WORK",
    };
    format!(
        "{decision} for {} ({}). Overall risk {:?}; most likely incident: {} \
         ({} within {}). Highest hazard score {:.0}/100.",
        report.metadata.project_name,
        report.metadata.work_type,
        report.synthesis.overall_risk_level,
        report.incident_prediction.incident_name,
        report.incident_prediction.probability,
        report.incident_prediction.timeframe,
        report.risk_assessment.risk_summary.highest_risk_score,
    )
}

/// Full plain-text briefing with one section per stage
pub fn to_text(report: &SafetyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SAFETY ANALYSIS REPORT {}", report.metadata.report_id);
    let _ = writeln!(
        out,
        "{} | {} | {}",
        report.metadata.project_name, report.metadata.location, report.metadata.work_type
    );
    let _ = writeln!(out, "Generated: {}", report.metadata.generated_at.to_rfc3339());
    let _ = writeln!(out);
    let _ = writeln!(out, "== EXECUTIVE SUMMARY ==");
    let _ = writeln!(out, "{}", executive_summary(report));
    let _ = writeln!(out);

    let _ = writeln!(out, "== DATA VALIDATION ==");
    let _ = writeln!(
        out,
        "Quality {:.1}/10 ({:?}); recommended action {:?}",
        report.validation.quality_score,
        report.validation.data_quality,
        report.validation.recommended_action
    );
    for missing in &report.validation.missing_critical {
        let _ = writeln!(out, "  MISSING: {}", missing);
    }
    for concern in &report.validation.concerns.critical {
        let _ = writeln!(out, "  CRITICAL CONCERN: {}", concern);
    }
    for concern in &report.validation.concerns.high {
        let _ = writeln!(out, "  HIGH CONCERN: {}", concern);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "== RISK ASSESSMENT ==");
    let _ = writeln!(
        out,
        "Overall {:?}, highest score {:.0}/100",
        report.risk_assessment.risk_summary.overall_risk_level,
        report.risk_assessment.risk_summary.highest_risk_score
    );
    for hazard in &report.risk_assessment.hazards {
        let _ = writeln!(
            out,
            "  [{:?}] {} - score {:.0} ({:?} consequence)",
            hazard.risk_level, hazard.name, hazard.risk_score, hazard.consequence
        );
        for control in &hazard.recommended_controls {
            let _ = writeln!(out, "      -> {}", control);
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "== INCIDENT PREDICTION ==");
    let _ = writeln!(
        out,
        "{} ({} within {}, confidence {:?})",
        report.incident_prediction.incident_name,
        report.incident_prediction.probability,
        report.incident_prediction.timeframe,
        report.incident_prediction.confidence
    );
    for (i, stage) in report.incident_prediction.causal_chain.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}: {}", i + 1, stage.stage, stage.description);
    }
    for indicator in &report.incident_prediction.leading_indicators {
        let _ = writeln!(
            out,
            "  WATCH [{:?}] {}: {}",
            indicator.indicator_type, indicator.where_to_look, indicator.what_to_see
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "== DECISION ==");
    let _ = writeln!(out, "{:?}", report.synthesis.decision.decision);
    for condition in &report.synthesis.decision.conditions {
        let _ = writeln!(out, "  CONDITION: {}", condition);
    }
    if let Some(restriction) = &report.synthesis.decision.time_restriction {
        let _ = writeln!(out, "  TIME RESTRICTION: {}", restriction);
    }
    for action in &report.synthesis.critical_actions {
        let _ = writeln!(out, "  ACTION: {}", action);
    }

    out
}
