//! Version-adapter scenarios against the public API: legacy documents of
//! varying completeness must always land in the canonical shape with
//! conservative defaults.

use proptest::prelude::*;
use serde_json::{Value, json};

use sitewarden::types::GoNoGo;
use sitewarden::{ReportVariant, VersionAdapter};

fn legacy_minimal() -> Value {
    json!({
        "pipeline_metadata": { "version": "1.0" },
        "agent_outputs": {
            "agent1_validation": {},
            "agent2_risk_assessment": { "hazards": [] },
            "agent3_swiss_cheese": {},
            "agent4_final_report": {}
        },
        "summary": {}
    })
}

#[test]
fn minimal_legacy_document_adapts_with_defaults() {
    let report = VersionAdapter::adapt(legacy_minimal()).unwrap();

    assert_eq!(report.validation.quality_score, 7.5);
    assert!(report.risk_assessment.hazards.len() >= 1);
    assert_eq!(report.risk_assessment.hazards[0].name, "General Safety Risk");
    assert_eq!(report.risk_assessment.risk_summary.highest_risk_score, 50.0);
    assert_eq!(
        report.risk_assessment.risk_summary.overall_risk_level,
        sitewarden::types::RiskLevel::Medium
    );
    assert_eq!(report.incident_prediction.timeframe, "1-6 months");
    assert_eq!(report.incident_prediction.probability.value(), 25.0);
    assert!(!report.incident_prediction.causal_chain.is_empty());
    // No recorded decision is never permission to proceed
    assert_eq!(report.synthesis.decision.decision, GoNoGo::NoGo);
}

#[test]
fn go_with_conditions_maps_to_conditional_go() {
    let mut doc = legacy_minimal();
    doc["summary"]["go_no_go_decision"] = json!("GO_WITH_CONDITIONS");
    let report = VersionAdapter::adapt(doc).unwrap();
    assert_eq!(report.synthesis.decision.decision, GoNoGo::ConditionalGo);
}

#[test]
fn fraction_probability_renders_as_percent() {
    let mut doc = legacy_minimal();
    doc["agent_outputs"]["agent3_swiss_cheese"]["probability"] = json!(0.25);
    let report = VersionAdapter::adapt(doc).unwrap();
    assert_eq!(report.incident_prediction.probability.to_string(), "25%");
}

#[test]
fn percent_probability_passes_through() {
    let mut doc = legacy_minimal();
    doc["agent_outputs"]["agent3_swiss_cheese"]["probability"] = json!(25);
    let report = VersionAdapter::adapt(doc).unwrap();
    assert_eq!(report.incident_prediction.probability.to_string(), "25%");
}

#[test]
fn adaptation_is_idempotent() {
    let mut doc = legacy_minimal();
    doc["summary"]["go_no_go_decision"] = json!("GO");
    doc["agent_outputs"]["agent2_risk_assessment"]["hazards"] = json!([{
        "name": "Unshored trench wall",
        "category": "Caught-Between",
        "probability": 0.2,
        "consequence": "Fatal"
    }]);

    let first = VersionAdapter::adapt(doc).unwrap();
    let canonical = serde_json::to_value(&first).unwrap();
    assert_eq!(
        VersionAdapter::detect(&canonical),
        Some(ReportVariant::Canonical)
    );
    let second = VersionAdapter::adapt(canonical).unwrap();
    assert_eq!(first, second);
}

#[test]
fn foreign_document_is_rejected() {
    assert!(VersionAdapter::adapt(json!({ "weather": "sunny" })).is_err());
    assert!(VersionAdapter::adapt(json!([1, 2, 3])).is_err());
}

proptest! {
    // Any decision string outside the recognized set must map to NO_GO.
    #[test]
    fn arbitrary_decision_strings_never_grant_go(raw in "[A-Za-z_ ]{0,24}") {
        let canonical = raw.trim().to_uppercase();
        prop_assume!(!matches!(
            canonical.as_str(),
            "GO" | "CONDITIONAL_GO" | "GO_WITH_CONDITIONS" | "NO_GO" | "STOP_WORK"
        ));

        let mut doc = legacy_minimal();
        doc["summary"]["go_no_go_decision"] = json!(raw);
        let report = VersionAdapter::adapt(doc).unwrap();
        prop_assert_eq!(report.synthesis.decision.decision, GoNoGo::NoGo);
    }

    // Probability of any provenance stays inside [0, 100] after adaptation.
    #[test]
    fn adapted_probability_is_always_in_range(p in -10.0f64..500.0) {
        let mut doc = legacy_minimal();
        doc["agent_outputs"]["agent3_swiss_cheese"]["probability"] = json!(p);
        let report = VersionAdapter::adapt(doc).unwrap();
        let value = report.incident_prediction.probability.value();
        prop_assert!((0.0..=100.0).contains(&value));
    }
}
