//! Report Version Adapter
//!
//! Normalizes stored reports of any known producer generation into the
//! canonical [`SafetyReport`]. Two shapes are recognized: the canonical
//! shape itself (adapted unchanged, so adaptation is idempotent) and the
//! legacy multi-agent shape whose stage outputs live under `agent_outputs`
//! with camelCase or snake_case field names. Anything else is rejected
//! rather than guessed at.
//!
//! The adapter is total over recognized shapes: a missing field gets a
//! documented safe default, and a missing or unrecognized decision maps to
//! NO_GO so a degraded report can never authorize work.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::constants::defaults;
use crate::report::findings;
use crate::types::{
    CausalStage, ConcernBuckets, ConsequenceSeverity, DataQuality, DecisionBasis, GoNoGo,
    GoNoGoDecision, Hazard, HazardCategory, IncidentPredictionOutput, Interventions, Percentage,
    PipelineMetadata, Rating, RecommendedAction, ReportMetadata, Result, RiskAssessmentOutput,
    RiskLevel, RiskSummary, SafetyReport, SynthesisOutput, ValidationOutput, WardenError,
    WeatherSeverity,
};

/// Recognized producer generations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportVariant {
    Canonical,
    LegacyMultiAgent,
}

pub struct VersionAdapter;

impl VersionAdapter {
    /// Identify which producer generation a stored document belongs to.
    pub fn detect(value: &Value) -> Option<ReportVariant> {
        let obj = value.as_object()?;
        if obj.contains_key("validation")
            && obj.contains_key("risk_assessment")
            && obj.contains_key("synthesis")
        {
            return Some(ReportVariant::Canonical);
        }
        if obj.contains_key("agent_outputs")
            || obj.contains_key("pipeline_metadata")
            || obj.contains_key("summary")
        {
            return Some(ReportVariant::LegacyMultiAgent);
        }
        None
    }

    /// Normalize a stored document into the canonical report shape.
    pub fn adapt(value: Value) -> Result<SafetyReport> {
        match Self::detect(&value) {
            Some(ReportVariant::Canonical) => {
                debug!("adapting canonical report (pass-through)");
                let report: SafetyReport = serde_json::from_value(value)
                    .map_err(|e| WardenError::Adaptation(format!("canonical decode: {}", e)))?;
                Ok(normalize_canonical(report))
            }
            Some(ReportVariant::LegacyMultiAgent) => {
                debug!("adapting legacy multi-agent report");
                Ok(adapt_legacy(&value))
            }
            None => Err(WardenError::Adaptation(
                "document matches no known report shape".to_string(),
            )),
        }
    }
}

/// Re-apply structural invariants to a canonical document. A canonical
/// report that already satisfies them passes through unchanged.
fn normalize_canonical(mut report: SafetyReport) -> SafetyReport {
    report.risk_assessment = report.risk_assessment.normalize();
    report.incident_prediction = report.incident_prediction.normalize();
    report
}

// =============================================================================
// Legacy shape
// =============================================================================

fn adapt_legacy(value: &Value) -> SafetyReport {
    let agents = &value["agent_outputs"];
    let summary = &value["summary"];

    let validation = adapt_validation(&agents["agent1_validation"]);
    let risk_assessment = adapt_risk(&agents["agent2_risk_assessment"], summary);
    let incident_prediction = adapt_prediction(&agents["agent3_swiss_cheese"]);
    let synthesis = adapt_synthesis(
        &agents["agent4_final_report"],
        summary,
        &validation,
        &risk_assessment,
        &incident_prediction,
    );

    SafetyReport {
        metadata: adapt_metadata(value),
        validation,
        risk_assessment,
        incident_prediction,
        synthesis,
        pipeline: adapt_pipeline(&value["pipeline_metadata"]),
    }
}

fn adapt_metadata(value: &Value) -> ReportMetadata {
    ReportMetadata {
        report_id: str_any(value, &["report_id", "reportId", "id"])
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        generated_at: str_any(value, &["generated_at", "generatedAt", "created_at", "createdAt"])
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now),
        project_name: str_any(value, &["project_name", "projectName"])
            .unwrap_or_else(|| "Unknown Project".to_string()),
        location: str_any(value, &["location"]).unwrap_or_else(|| "Unknown".to_string()),
        work_type: str_any(value, &["work_type", "workType"])
            .unwrap_or_else(|| "General Construction".to_string()),
        supervisor: str_any(value, &["supervisor"]).unwrap_or_else(|| "Unassigned".to_string()),
    }
}

fn adapt_pipeline(value: &Value) -> PipelineMetadata {
    let models_used = value
        .get("models_used")
        .or_else(|| value.get("modelsUsed"))
        .and_then(|m| m.as_object())
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default();

    PipelineMetadata {
        version: str_any(value, &["version"]).unwrap_or_else(|| "1.0".to_string()),
        execution_time_ms: f64_any(value, &["execution_time_ms", "executionTimeMs"])
            .map(|v| v as u64)
            .unwrap_or(0),
        models_used,
    }
}

fn adapt_validation(value: &Value) -> ValidationOutput {
    let quality_score = f64_any(value, &["quality_score", "qualityScore"])
        .unwrap_or(defaults::QUALITY_SCORE)
        .clamp(0.0, 10.0);

    let recommended_action = str_any(value, &["recommended_action", "recommendedAction"])
        .map(|raw| match raw.trim().to_uppercase().as_str() {
            "REQUEST_CLARIFICATION" => RecommendedAction::RequestClarification,
            "REJECT_UNSAFE" => RecommendedAction::RejectUnsafe,
            _ => RecommendedAction::Proceed,
        })
        .unwrap_or(RecommendedAction::Proceed);

    ValidationOutput {
        quality_score,
        data_quality: DataQuality::from_score(quality_score),
        missing_critical: string_list_any(value, &["missing_critical", "missingCritical"]),
        insufficient_responses: value
            .get("insufficient_responses")
            .or_else(|| value.get("insufficientResponses"))
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default(),
        concerns: adapt_concerns(value.get("concerns")),
        recommended_action,
    }
}

/// Legacy concerns arrive as a partial map (absent buckets, sometimes a
/// flat list). The canonical shape always carries all four buckets.
fn adapt_concerns(value: Option<&Value>) -> ConcernBuckets {
    let Some(value) = value else {
        return ConcernBuckets::default();
    };

    if let Some(flat) = value.as_array() {
        // Oldest producers emitted one undifferentiated list
        return ConcernBuckets {
            medium: flat
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            ..Default::default()
        };
    }

    let bucket = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| value.get(*k))
            .map(|v| {
                v.as_array()
                    .map(|a| {
                        a.iter()
                            .filter_map(|s| s.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    };

    ConcernBuckets {
        critical: bucket(&["CRITICAL", "critical"]),
        high: bucket(&["HIGH", "high"]),
        medium: bucket(&["MEDIUM", "medium"]),
        low: bucket(&["LOW", "low"]),
    }
}

fn adapt_risk(value: &Value, summary: &Value) -> RiskAssessmentOutput {
    // Some legacy producers nest the summary fields, others keep them flat
    let nested = value
        .get("risk_summary")
        .or_else(|| value.get("riskSummary"))
        .unwrap_or(value);

    let summary_score = f64_any(nested, &["highest_risk_score", "highestRiskScore"])
        .or_else(|| f64_any(summary, &["overall_risk_score", "overallRiskScore"]));

    let hazards: Vec<Hazard> = value
        .get("hazards")
        .and_then(|h| h.as_array())
        .map(|list| list.iter().map(adapt_hazard).collect())
        .unwrap_or_else(|| scraped_hazards(value));

    // The documented default applies only when the report carries neither
    // a summary score nor any hazards; a real hazard maximum below the
    // default must not be inflated to it.
    let highest = hazards
        .iter()
        .map(|h| h.risk_score)
        .fold(summary_score.unwrap_or(f64::NEG_INFINITY), f64::max);
    let highest = if highest.is_finite() {
        highest
    } else {
        defaults::RISK_SCORE
    };

    RiskAssessmentOutput {
        risk_summary: RiskSummary {
            overall_risk_level: str_any(nested, &["overall_risk_level", "overallRiskLevel"])
                .map(|raw| risk_level_from_raw(&raw))
                .unwrap_or_else(|| RiskLevel::from_score(highest)),
            highest_risk_score: highest,
            industry_context: str_any(nested, &["industry_context", "industryContext"])
                .unwrap_or_else(|| "Construction".to_string()),
        },
        hazards,
        top_threats: string_list_any(value, &["top_threats", "topThreats"]),
    }
    .normalize()
}

/// Oldest producers stored the risk agent's output as free text rather
/// than a hazards array. Scrape what structure the text yields; text with
/// no recognizable findings produces no hazards and the placeholder path
/// takes over in `normalize`.
fn scraped_hazards(value: &Value) -> Vec<Hazard> {
    let text = value
        .as_str()
        .map(str::to_string)
        .or_else(|| str_any(value, &["analysis", "raw_analysis", "rawAnalysis", "text"]));
    let Some(text) = text else {
        return Vec::new();
    };

    let found = findings::scrape(&text);
    let probability = defaults::PLACEHOLDER_HAZARD_PROBABILITY;
    let consequence = ConsequenceSeverity::Serious;
    let risk_score = Hazard::score(probability, consequence);

    found
        .hazards
        .iter()
        .map(|name| Hazard {
            name: name.clone(),
            category: HazardCategory::Other,
            probability,
            consequence,
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            regulatory_context: if found.citations.is_empty() {
                "General industry standards apply".to_string()
            } else {
                found.citations.join(", ")
            },
            inadequate_controls: Vec::new(),
            recommended_controls: found.recommendations.clone(),
        })
        .collect()
}

fn adapt_hazard(value: &Value) -> Hazard {
    let probability = f64_any(value, &["probability"])
        .map(|p| Percentage::from_ambiguous(p).as_fraction())
        .unwrap_or(defaults::PLACEHOLDER_HAZARD_PROBABILITY);
    let consequence = str_any(value, &["consequence", "severity"])
        .map(|raw| match raw.trim().to_lowercase().as_str() {
            "fatal" => ConsequenceSeverity::Fatal,
            "critical" => ConsequenceSeverity::Critical,
            "minor" => ConsequenceSeverity::Minor,
            _ => ConsequenceSeverity::Serious,
        })
        .unwrap_or(ConsequenceSeverity::Serious);
    let risk_score = f64_any(value, &["risk_score", "riskScore"])
        .unwrap_or_else(|| Hazard::score(probability, consequence));

    Hazard {
        name: str_any(value, &["name", "hazard"])
            .unwrap_or_else(|| defaults::PLACEHOLDER_HAZARD_NAME.to_string()),
        category: str_any(value, &["category"])
            .map(|raw| category_from_raw(&raw))
            .unwrap_or(HazardCategory::Other),
        probability,
        consequence,
        risk_score: risk_score.clamp(0.0, 100.0),
        risk_level: RiskLevel::from_score(risk_score),
        regulatory_context: str_any(value, &["regulatory_context", "regulatoryContext"])
            .unwrap_or_else(|| "General industry standards apply".to_string()),
        inadequate_controls: string_list_any(
            value,
            &["inadequate_controls", "inadequateControls"],
        ),
        recommended_controls: string_list_any(
            value,
            &["recommended_controls", "recommendedControls"],
        ),
    }
}

fn adapt_prediction(value: &Value) -> IncidentPredictionOutput {
    let probability = f64_any(value, &["probability"])
        .map(Percentage::from_ambiguous)
        .unwrap_or_else(|| Percentage::new(defaults::INCIDENT_PROBABILITY_PCT));

    let causal_chain: Vec<CausalStage> = value
        .get("causal_chain")
        .or_else(|| value.get("causalChain"))
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    IncidentPredictionOutput {
        incident_name: str_any(value, &["incident_name", "incidentName"])
            .unwrap_or_else(|| "Potential Safety Incident".to_string()),
        timeframe: str_any(value, &["timeframe"])
            .unwrap_or_else(|| defaults::INCIDENT_TIMEFRAME.to_string()),
        probability,
        confidence: str_any(value, &["confidence"])
            .map(|raw| rating_from_raw(&raw))
            .unwrap_or(Rating::Medium),
        causal_chain,
        leading_indicators: value
            .get("leading_indicators")
            .or_else(|| value.get("leadingIndicators"))
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default(),
        interventions: value
            .get("interventions")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_else(Interventions::default),
    }
    .normalize()
}

fn adapt_synthesis(
    value: &Value,
    summary: &Value,
    validation: &ValidationOutput,
    risk: &RiskAssessmentOutput,
    prediction: &IncidentPredictionOutput,
) -> SynthesisOutput {
    let decision_raw = str_any(value, &["go_no_go", "goNoGo", "decision"])
        .or_else(|| str_any(summary, &["go_no_go_decision", "goNoGoDecision"]));
    // No decision recorded means no permission to proceed
    let decision = decision_raw
        .map(|raw| GoNoGo::from_raw(&raw))
        .unwrap_or(GoNoGo::NoGo);

    let basis = value.get("basis").map(adapt_basis).unwrap_or(DecisionBasis {
        highest_risk_score: risk.risk_summary.highest_risk_score,
        critical_gaps_count: validation.missing_critical.len(),
        weather_severity: WeatherSeverity::Normal,
        regulatory_violations: 0,
        emergency_readiness: true,
    });

    SynthesisOutput {
        decision: GoNoGoDecision {
            decision,
            basis,
            conditions: string_list_any(value, &["conditions"]),
            time_restriction: str_any(value, &["time_restriction", "timeRestriction"]),
        },
        overall_risk_level: str_any(value, &["overall_risk_level", "overallRiskLevel"])
            .map(|raw| risk_level_from_raw(&raw))
            .unwrap_or(risk.risk_summary.overall_risk_level),
        incident_probability: f64_any(
            summary,
            &["incident_probability", "incidentProbability"],
        )
        .map(Percentage::from_ambiguous)
        .unwrap_or(prediction.probability),
        top_threats: {
            let own = string_list_any(value, &["top_threats", "topThreats"]);
            let fallback = string_list_any(summary, &["primary_concerns", "primaryConcerns"]);
            if own.is_empty() {
                if fallback.is_empty() {
                    risk.top_threats.clone()
                } else {
                    fallback
                }
            } else {
                own
            }
        },
        critical_actions: string_list_any(value, &["critical_actions", "criticalActions"]),
    }
}

fn adapt_basis(value: &Value) -> DecisionBasis {
    DecisionBasis {
        highest_risk_score: f64_any(value, &["highest_risk_score", "highestRiskScore"])
            .unwrap_or(0.0),
        critical_gaps_count: f64_any(value, &["critical_gaps_count", "criticalGapsCount"])
            .map(|v| v as usize)
            .unwrap_or(0),
        weather_severity: str_any(value, &["weather_severity", "weatherSeverity"])
            .map(|raw| match raw.trim().to_uppercase().as_str() {
                "EXTREME" => WeatherSeverity::Extreme,
                "ELEVATED" => WeatherSeverity::Elevated,
                _ => WeatherSeverity::Normal,
            })
            .unwrap_or(WeatherSeverity::Normal),
        regulatory_violations: f64_any(value, &["regulatory_violations", "regulatoryViolations"])
            .map(|v| v as usize)
            .unwrap_or(0),
        emergency_readiness: value
            .get("emergency_readiness")
            .or_else(|| value.get("emergencyReadiness"))
            .and_then(|v| v.as_bool())
            .unwrap_or(true),
    }
}

// =============================================================================
// Raw-string enum mappings (forgiving about case)
// =============================================================================

fn risk_level_from_raw(raw: &str) -> RiskLevel {
    match raw.trim().to_uppercase().as_str() {
        "EXTREME" => RiskLevel::Extreme,
        "HIGH" => RiskLevel::High,
        "MEDIUM" | "MODERATE" => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

fn rating_from_raw(raw: &str) -> Rating {
    match raw.trim().to_uppercase().as_str() {
        "HIGH" => Rating::High,
        "LOW" => Rating::Low,
        _ => Rating::Medium,
    }
}

fn category_from_raw(raw: &str) -> HazardCategory {
    match raw.trim().to_lowercase().as_str() {
        "falls" | "fall" => HazardCategory::Falls,
        "struck-by" | "struck by" | "struckby" => HazardCategory::StruckBy,
        "electrocution" | "electrical" => HazardCategory::Electrocution,
        "caught-between" | "caught between" | "caughtbetween" => HazardCategory::CaughtBetween,
        _ => HazardCategory::Other,
    }
}

// =============================================================================
// Lenient accessors
// =============================================================================

fn str_any(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| value.get(*k))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn f64_any(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| value.get(*k)).and_then(|v| v.as_f64())
}

fn string_list_any(value: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|k| value.get(*k))
        .and_then(|v| v.as_array())
        .map(|a| {
            a.iter()
                .filter_map(|s| s.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn legacy_report() -> Value {
        json!({
            "report_id": "legacy-42",
            "created_at": "2026-03-01T08:00:00Z",
            "project_name": "Dockside Expansion",
            "location": "Pier 9",
            "work_type": "Roofing",
            "pipeline_metadata": {
                "version": "1.2",
                "execution_time_ms": 8421,
                "models_used": { "agent1": "gemini-1.5-pro" }
            },
            "agent_outputs": {
                "agent1_validation": {
                    "qualityScore": 6.0,
                    "missingCritical": ["Emergency contact list"],
                    "concerns": { "HIGH": ["Wind exposure on deck"] },
                    "recommendedAction": "PROCEED"
                },
                "agent2_risk_assessment": {
                    "hazards": [{
                        "name": "Leading edge fall",
                        "category": "Falls",
                        "probability": 0.4,
                        "consequence": "Fatal",
                        "regulatoryContext": "1926.501(b)(1)"
                    }],
                    "topThreats": ["Falls from roof deck"]
                },
                "agent3_swiss_cheese": {
                    "incidentName": "Fall during membrane work",
                    "probability": 0.25,
                    "confidence": "HIGH",
                    "causalChain": [
                        { "stage": "Organizational", "description": "No rescue plan on file" }
                    ]
                },
                "agent4_final_report": {
                    "go_no_go": "GO_WITH_CONDITIONS",
                    "conditions": ["100% tie-off above 6 feet"]
                }
            },
            "summary": {
                "overall_risk_score": 88.0,
                "incident_probability": 25,
                "primary_concerns": ["Falls"]
            }
        })
    }

    #[test]
    fn test_detect_variants() {
        assert_eq!(
            VersionAdapter::detect(&legacy_report()),
            Some(ReportVariant::LegacyMultiAgent)
        );
        assert_eq!(VersionAdapter::detect(&json!({"anything": 1})), None);
        assert_eq!(VersionAdapter::detect(&json!("not an object")), None);
    }

    #[test]
    fn test_legacy_adaptation_maps_stage_outputs() {
        let report = VersionAdapter::adapt(legacy_report()).unwrap();

        assert_eq!(report.metadata.report_id, "legacy-42");
        assert_eq!(report.metadata.project_name, "Dockside Expansion");
        assert_eq!(report.validation.quality_score, 6.0);
        assert_eq!(report.validation.data_quality, DataQuality::Medium);
        assert_eq!(report.validation.concerns.high, vec!["Wind exposure on deck"]);
        assert_eq!(report.pipeline.version, "1.2");

        let hazard = &report.risk_assessment.hazards[0];
        assert_eq!(hazard.category, HazardCategory::Falls);
        assert_eq!(hazard.consequence, ConsequenceSeverity::Fatal);
        // 0.4 x 100 x 10, capped
        assert_eq!(hazard.risk_score, 100.0);
    }

    #[test]
    fn test_legacy_decision_variant_maps_to_conditional_go() {
        let report = VersionAdapter::adapt(legacy_report()).unwrap();
        assert_eq!(report.synthesis.decision.decision, GoNoGo::ConditionalGo);
        assert_eq!(
            report.synthesis.decision.conditions,
            vec!["100% tie-off above 6 feet"]
        );
    }

    #[test]
    fn test_legacy_fraction_probability_scales_to_percent() {
        let report = VersionAdapter::adapt(legacy_report()).unwrap();
        assert_eq!(report.incident_prediction.probability.value(), 25.0);
        assert_eq!(report.incident_prediction.probability.to_string(), "25%");
        assert_eq!(report.synthesis.incident_probability.value(), 25.0);
    }

    #[test]
    fn test_missing_decision_is_no_go() {
        let mut value = legacy_report();
        value["agent_outputs"]["agent4_final_report"] = json!({});
        value["summary"] = json!({});
        let report = VersionAdapter::adapt(value).unwrap();
        assert_eq!(report.synthesis.decision.decision, GoNoGo::NoGo);
    }

    #[test]
    fn test_empty_hazards_synthesizes_placeholder() {
        let mut value = legacy_report();
        value["agent_outputs"]["agent2_risk_assessment"]["hazards"] = json!([]);
        let report = VersionAdapter::adapt(value).unwrap();
        assert_eq!(report.risk_assessment.hazards.len(), 1);
        assert_eq!(report.risk_assessment.hazards[0].name, "General Safety Risk");
    }

    #[test]
    fn test_missing_validation_gets_defaults() {
        let mut value = legacy_report();
        value["agent_outputs"]["agent1_validation"] = json!({});
        let report = VersionAdapter::adapt(value).unwrap();
        assert_eq!(report.validation.quality_score, 7.5);
        assert_eq!(report.validation.data_quality, DataQuality::Medium);
        assert!(report.validation.concerns.is_empty());
    }

    #[test]
    fn test_canonical_adaptation_is_idempotent() {
        let adapted = VersionAdapter::adapt(legacy_report()).unwrap();
        let canonical = serde_json::to_value(&adapted).unwrap();
        let readapted = VersionAdapter::adapt(canonical).unwrap();
        assert_eq!(adapted, readapted);
    }

    #[test]
    fn test_foreign_document_rejected() {
        let err = VersionAdapter::adapt(json!({"totally": "unrelated"})).unwrap_err();
        assert!(matches!(err, WardenError::Adaptation(_)));
    }

    #[test]
    fn test_real_hazard_maximum_below_default_is_kept() {
        let mut value = legacy_report();
        value["summary"] = json!({});
        value["agent_outputs"]["agent2_risk_assessment"] = json!({
            "hazards": [{
                "name": "Pinch point at conveyor",
                "category": "Caught-Between",
                "probability": 0.1,
                "consequence": "Minor"
            }]
        });
        let report = VersionAdapter::adapt(value).unwrap();
        // 0.1 x 100 x 1; a maximum below the missing-score default stays put
        assert_eq!(report.risk_assessment.risk_summary.highest_risk_score, 10.0);
        assert_eq!(
            report.risk_assessment.risk_summary.overall_risk_level,
            RiskLevel::Low
        );
    }

    #[test]
    fn test_free_text_risk_output_is_scraped() {
        let mut value = legacy_report();
        value["agent_outputs"]["agent2_risk_assessment"] = json!(
            "Hazard: unguarded floor opening on level 3\n\
             Recommendation: install covers immediately\n\
             Violates 1926.501(b)(4)."
        );
        let report = VersionAdapter::adapt(value).unwrap();
        let hazard = &report.risk_assessment.hazards[0];
        assert_eq!(hazard.name, "unguarded floor opening on level 3");
        assert!(hazard.regulatory_context.contains("1926.501(b)(4)"));
        assert_eq!(
            hazard.recommended_controls,
            vec!["install covers immediately"]
        );
    }

    #[test]
    fn test_out_of_range_canonical_probability_is_clamped() {
        let adapted = VersionAdapter::adapt(legacy_report()).unwrap();
        let mut canonical = serde_json::to_value(&adapted).unwrap();
        canonical["incident_prediction"]["probability"] = json!(140.0);
        canonical["synthesis"]["incident_probability"] = json!(140.0);

        let report = VersionAdapter::adapt(canonical).unwrap();
        assert_eq!(report.incident_prediction.probability.value(), 100.0);
        assert_eq!(report.synthesis.incident_probability.value(), 100.0);
    }

    #[test]
    fn test_flat_concern_list_lands_in_medium_bucket() {
        let concerns = adapt_concerns(Some(&json!(["One concern", "Another"])));
        assert_eq!(concerns.medium.len(), 2);
        assert!(concerns.critical.is_empty());
    }
}
