//! Stage Response Schemas
//!
//! Expected response shapes, embedded into each generation request so the
//! model returns decodable JSON. These mirror the typed structures in
//! [`crate::types::report`]; decoding failures after extraction surface as
//! malformed-output errors, never retries.

use serde_json::{Value, json};

/// Stage 1: data validation response shape
pub fn validation() -> Value {
    json!({
        "type": "object",
        "properties": {
            "quality_score": { "type": "number", "minimum": 0, "maximum": 10 },
            "data_quality": { "enum": ["HIGH", "MEDIUM", "LOW"] },
            "missing_critical": { "type": "array", "items": { "type": "string" } },
            "insufficient_responses": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "field": { "type": "string" },
                        "issue": { "type": "string" }
                    },
                    "required": ["field", "issue"]
                }
            },
            "concerns": {
                "type": "object",
                "properties": {
                    "CRITICAL": { "type": "array", "items": { "type": "string" } },
                    "HIGH": { "type": "array", "items": { "type": "string" } },
                    "MEDIUM": { "type": "array", "items": { "type": "string" } },
                    "LOW": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["CRITICAL", "HIGH", "MEDIUM", "LOW"]
            },
            "recommended_action": {
                "enum": ["PROCEED", "REQUEST_CLARIFICATION", "REJECT_UNSAFE"]
            }
        },
        "required": [
            "quality_score", "data_quality", "missing_critical",
            "concerns", "recommended_action"
        ]
    })
}

/// Stage 2: risk assessment response shape
pub fn risk_assessment() -> Value {
    json!({
        "type": "object",
        "properties": {
            "risk_summary": {
                "type": "object",
                "properties": {
                    "overall_risk_level": { "enum": ["EXTREME", "HIGH", "MEDIUM", "LOW"] },
                    "highest_risk_score": { "type": "number", "minimum": 0, "maximum": 100 },
                    "industry_context": { "type": "string" }
                },
                "required": ["overall_risk_level", "highest_risk_score", "industry_context"]
            },
            "hazards": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "category": {
                            "enum": ["Falls", "Struck-By", "Electrocution", "Caught-Between", "Other"]
                        },
                        "probability": { "type": "number", "minimum": 0, "maximum": 1 },
                        "consequence": { "enum": ["Fatal", "Critical", "Serious", "Minor"] },
                        "risk_score": { "type": "number", "minimum": 0, "maximum": 100 },
                        "risk_level": { "enum": ["EXTREME", "HIGH", "MEDIUM", "LOW"] },
                        "regulatory_context": { "type": "string" },
                        "inadequate_controls": { "type": "array", "items": { "type": "string" } },
                        "recommended_controls": { "type": "array", "items": { "type": "string" } }
                    },
                    "required": [
                        "name", "category", "probability", "consequence",
                        "risk_score", "risk_level", "regulatory_context",
                        "inadequate_controls", "recommended_controls"
                    ]
                }
            },
            "top_threats": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["risk_summary", "hazards", "top_threats"]
    })
}

/// Stage 3: incident prediction response shape
pub fn incident_prediction() -> Value {
    json!({
        "type": "object",
        "properties": {
            "incident_name": { "type": "string" },
            "timeframe": { "type": "string" },
            "probability": { "type": "number", "minimum": 0, "maximum": 100 },
            "confidence": { "enum": ["HIGH", "MEDIUM", "LOW"] },
            "causal_chain": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "stage": { "type": "string" },
                        "description": { "type": "string" },
                        "evidence": { "type": "string" },
                        "why": { "type": "string" },
                        "severity": { "type": "string" },
                        "time_to_intervene": { "type": "string" }
                    },
                    "required": ["stage", "description"]
                }
            },
            "leading_indicators": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "indicator_type": {
                            "enum": ["Behavioral", "Environmental", "Organizational", "Near-Miss"]
                        },
                        "where_to_look": { "type": "string" },
                        "what_to_see": { "type": "string" },
                        "threshold": { "type": "string" },
                        "action_required": { "type": "string" }
                    },
                    "required": [
                        "indicator_type", "where_to_look", "what_to_see",
                        "threshold", "action_required"
                    ]
                }
            },
            "interventions": {
                "type": "object",
                "properties": {
                    "preventive": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "tier": {
                                    "enum": ["Elimination", "Engineering", "Administrative", "PPE"]
                                },
                                "action": { "type": "string" },
                                "feasibility": { "enum": ["HIGH", "MEDIUM", "LOW"] },
                                "cost": { "enum": ["HIGH", "MEDIUM", "LOW"] },
                                "time_to_implement": { "type": "string" },
                                "effectiveness": { "type": "string" }
                            },
                            "required": [
                                "tier", "action", "feasibility", "cost",
                                "time_to_implement", "effectiveness"
                            ]
                        }
                    },
                    "mitigative": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "action": { "type": "string" },
                                "reduces_harm": { "type": "string" }
                            },
                            "required": ["action", "reduces_harm"]
                        }
                    },
                    "recommended": { "type": "string" }
                }
            }
        },
        "required": ["incident_name", "timeframe", "probability", "confidence", "causal_chain"]
    })
}

/// Stage 4: synthesis response shape
pub fn synthesis() -> Value {
    json!({
        "type": "object",
        "properties": {
            "decision": {
                "type": "object",
                "properties": {
                    "decision": {
                        "enum": ["GO", "CONDITIONAL_GO", "NO_GO", "STOP_WORK"]
                    },
                    "basis": {
                        "type": "object",
                        "properties": {
                            "highest_risk_score": { "type": "number" },
                            "critical_gaps_count": { "type": "integer" },
                            "weather_severity": { "enum": ["NORMAL", "ELEVATED", "EXTREME"] },
                            "regulatory_violations": { "type": "integer" },
                            "emergency_readiness": { "type": "boolean" }
                        },
                        "required": [
                            "highest_risk_score", "critical_gaps_count",
                            "weather_severity", "regulatory_violations",
                            "emergency_readiness"
                        ]
                    },
                    "conditions": { "type": "array", "items": { "type": "string" } },
                    "time_restriction": { "type": "string" }
                },
                "required": ["decision", "basis"]
            },
            "overall_risk_level": { "enum": ["EXTREME", "HIGH", "MEDIUM", "LOW"] },
            "incident_probability": { "type": "number", "minimum": 0, "maximum": 100 },
            "top_threats": { "type": "array", "items": { "type": "string" } },
            "critical_actions": { "type": "array", "items": { "type": "string" } }
        },
        "required": [
            "decision", "overall_risk_level", "incident_probability",
            "top_threats", "critical_actions"
        ]
    })
}
