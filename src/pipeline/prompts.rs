//! Stage Prompt Assembly
//!
//! Pure functions that turn the collected site context and prior stage
//! outputs into prompt text. No I/O here; the executor owns transport.

use std::fmt::Write as _;

use crate::types::{
    IncidentPredictionOutput, RiskAssessmentOutput, SiteContext, ValidationOutput,
};

/// Trade-specific checkpoints folded into the validation prompt so the
/// model probes the fields that matter for the day's dominant work type.
pub fn trade_guidance(work_type: &str) -> &'static str {
    let lowered = work_type.to_lowercase();
    if lowered.contains("electric") {
        "Verify lockout/tagout procedures, energized-work permits, GFCI \
         protection, and qualified-person assignments."
    } else if lowered.contains("roof") {
        "Verify fall protection anchorage, leading-edge controls, weather \
         hold criteria, and material staging on the deck."
    } else if lowered.contains("excavat") || lowered.contains("trench") {
        "Verify protective systems (sloping, shoring, shielding), daily \
         competent-person inspection, spoil placement, and utility locates."
    } else if lowered.contains("scaffold") {
        "Verify scaffold tags, base plates and mudsills, guardrail \
         completeness, and competent-person inspection before each shift."
    } else if lowered.contains("demoli") {
        "Verify engineering survey, utility disconnects, falling-debris \
         zones, and structural stability monitoring."
    } else if lowered.contains("concrete") {
        "Verify formwork shoring design, rebar impalement protection, and \
         silica dust controls."
    } else if lowered.contains("weld") || lowered.contains("hot work") {
        "Verify hot-work permits, fire watch assignment, combustible \
         clearance, and ventilation."
    } else if lowered.contains("crane") || lowered.contains("lift") {
        "Verify lift plans, rigging inspection, ground conditions, and \
         swing-radius barricades."
    } else {
        "Verify housekeeping, PPE compliance, emergency egress, and \
         first-aid readiness."
    }
}

/// Shared context block prefixed to every stage prompt
fn context_block(ctx: &SiteContext) -> String {
    let mut block = String::new();
    let _ = writeln!(block, "SITE: {} ({})", ctx.location.name, ctx.location.site_type);
    let _ = writeln!(block, "ADDRESS: {}", ctx.location.address);
    let _ = writeln!(block, "AS OF: {}", ctx.as_of.to_rfc3339());
    let _ = writeln!(block, "WEATHER: {}", ctx.weather.summary());

    if !ctx.forecast.is_empty() {
        let _ = writeln!(block, "FORECAST:");
        for entry in &ctx.forecast {
            let _ = writeln!(block, "  - {}", entry.summary());
        }
    }

    let _ = writeln!(block, "SCHEDULED TASKS:");
    if ctx.tasks.is_empty() {
        let _ = writeln!(block, "  (none recorded)");
    }
    for task in &ctx.tasks {
        match task.crew_size {
            Some(crew) => {
                let _ = writeln!(
                    block,
                    "  - {} ({}, crew of {})",
                    task.description, task.task_type, crew
                );
            }
            None => {
                let _ = writeln!(block, "  - {} ({})", task.description, task.task_type);
            }
        }
    }

    if !ctx.recent_incidents.is_empty() {
        let _ = writeln!(block, "RECENT INCIDENTS AT SIMILAR SITES:");
        for incident in &ctx.recent_incidents {
            let _ = writeln!(
                block,
                "  - [{}] {} ({})",
                incident.severity,
                incident.description,
                incident.occurred_at.format("%Y-%m-%d")
            );
        }
    }

    block
}

fn encode<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Stage 1: validate the completeness and quality of the collected context
pub fn validation(ctx: &SiteContext) -> String {
    format!(
        "You are a construction safety data validator reviewing today's \
         site snapshot before any risk analysis runs.\n\n{}\n\
         WORK TYPE FOCUS: {}\n{}\n\n\
         Score the snapshot's quality from 0 to 10, name any missing \
         critical information, flag responses too thin to analyze, and \
         bucket every concern by severity. Recommend PROCEED, \
         REQUEST_CLARIFICATION, or REJECT_UNSAFE.",
        context_block(ctx),
        ctx.work_type(),
        trade_guidance(ctx.work_type()),
    )
}

/// Stage 2: quantify hazards from the validated context
pub fn risk_assessment(ctx: &SiteContext, validation: &ValidationOutput) -> String {
    format!(
        "You are a construction risk assessor. Identify and quantify every \
         hazard present in today's conditions.\n\n{}\n\
         VALIDATION FINDINGS:\n{}\n\n\
         For each hazard give a name, an OSHA Fatal Four category (Falls, \
         Struck-By, Electrocution, Caught-Between) or Other, an occurrence \
         probability between 0 and 1, a consequence severity (Fatal, \
         Critical, Serious, Minor), the applicable regulatory context, and \
         the controls that are inadequate versus recommended. Compute each \
         risk score as probability x 100 x severity multiplier (Fatal 10, \
         Critical 7, Serious 4, Minor 1), capped at 100.",
        context_block(ctx),
        encode(validation),
    )
}

/// Stage 3: predict the most likely incident and its causal chain
pub fn incident_prediction(ctx: &SiteContext, risk: &RiskAssessmentOutput) -> String {
    format!(
        "You are an incident-prediction analyst using the Swiss cheese \
         accident model. From the assessed hazards, predict the single most \
         likely incident.\n\n{}\n\
         RISK ASSESSMENT:\n{}\n\n\
         Describe the incident, its timeframe, and its probability as a \
         percentage between 0 and 100. Trace the causal chain of failed \
         defensive layers, list observable leading indicators a supervisor \
         could watch today, and propose preventive interventions by \
         hierarchy-of-controls tier plus mitigative measures.",
        context_block(ctx),
        encode(risk),
    )
}

/// Stage 4: synthesize the Go/No-Go decision from all prior stages
pub fn synthesis(
    ctx: &SiteContext,
    validation: &ValidationOutput,
    risk: &RiskAssessmentOutput,
    prediction: &IncidentPredictionOutput,
) -> String {
    format!(
        "You are the safety director making today's work authorization \
         decision for this site.\n\n{}\n\
         VALIDATION:\n{}\n\n\
         RISK ASSESSMENT:\n{}\n\n\
         INCIDENT PREDICTION:\n{}\n\n\
         Decide GO, CONDITIONAL_GO, NO_GO, or STOP_WORK. State the \
         quantitative basis (highest risk score, critical gaps, weather \
         severity, regulatory violations, emergency readiness), any \
         conditions attached to the decision, and any time restriction. \
         List the top threats and the critical actions for today.",
        context_block(ctx),
        encode(validation),
        encode(risk),
        encode(prediction),
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::{ScheduledTask, SiteLocation, WeatherObservation};

    fn context(task_type: &str) -> SiteContext {
        SiteContext {
            site_id: "site-1".to_string(),
            as_of: Utc::now(),
            location: SiteLocation {
                name: "Harbor Tower".to_string(),
                address: "12 Pier Rd".to_string(),
                latitude: 40.7,
                longitude: -74.0,
                site_type: "commercial-highrise".to_string(),
            },
            weather: WeatherObservation {
                temperature_f: 55.0,
                humidity: 60.0,
                wind_speed_mph: 22.0,
                conditions: "Gusty".to_string(),
                precipitation: false,
            },
            forecast: vec![],
            tasks: vec![ScheduledTask {
                task_type: task_type.to_string(),
                description: "North face work".to_string(),
                crew_size: Some(6),
            }],
            recent_incidents: vec![],
        }
    }

    #[test]
    fn test_trade_guidance_selection() {
        assert!(trade_guidance("Electrical rough-in").contains("lockout/tagout"));
        assert!(trade_guidance("Roofing").contains("fall protection"));
        assert!(trade_guidance("Trenching").contains("shoring"));
        assert!(trade_guidance("Painting").contains("housekeeping"));
    }

    #[test]
    fn test_validation_prompt_embeds_context_and_guidance() {
        let prompt = validation(&context("Roofing"));
        assert!(prompt.contains("Harbor Tower"));
        assert!(prompt.contains("Gusty"));
        assert!(prompt.contains("fall protection anchorage"));
        assert!(prompt.contains("crew of 6"));
    }

    #[test]
    fn test_synthesis_prompt_carries_prior_stages() {
        let ctx = context("Roofing");
        let validation_out = crate::types::ValidationOutput {
            quality_score: 8.0,
            data_quality: crate::types::DataQuality::High,
            missing_critical: vec![],
            insufficient_responses: vec![],
            concerns: Default::default(),
            recommended_action: crate::types::RecommendedAction::Proceed,
        };
        let risk = crate::types::RiskAssessmentOutput {
            risk_summary: crate::types::RiskSummary {
                overall_risk_level: crate::types::RiskLevel::High,
                highest_risk_score: 80.0,
                industry_context: "High-rise".to_string(),
            },
            hazards: vec![crate::types::Hazard::placeholder(80.0)],
            top_threats: vec!["Wind-driven falls".to_string()],
        };
        let prediction = crate::types::IncidentPredictionOutput {
            incident_name: "Fall from leading edge".to_string(),
            timeframe: "today".to_string(),
            probability: crate::types::Percentage::new(30.0),
            confidence: crate::types::Rating::Medium,
            causal_chain: vec![],
            leading_indicators: vec![],
            interventions: Default::default(),
        };

        let prompt = synthesis(&ctx, &validation_out, &risk, &prediction);
        assert!(prompt.contains("Wind-driven falls"));
        assert!(prompt.contains("Fall from leading edge"));
        assert!(prompt.contains("STOP_WORK"));
    }
}
