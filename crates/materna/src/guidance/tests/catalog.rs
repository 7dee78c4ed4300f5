use crate::guidance::catalog::{CatalogValidationError, RuleCatalog};
use crate::guidance::domain::{GuidanceCategory, Severity};
use crate::guidance::predicate::Condition;
use crate::guidance::presets::{antepartum_catalog, conversational_catalog};

#[test]
fn catalog_parses_from_json() {
    let payload = br#"[
        {
            "id": "bp_check",
            "category": "hypertension",
            "severity": "high",
            "condition": {
                "type": "any",
                "conditions": [
                    {"type": "compare", "field": "systolic_bp", "op": "ge", "value": 140},
                    {"type": "compare", "field": "diastolic_bp", "op": "ge", "value": 90}
                ]
            },
            "recommendation": "Recheck blood pressure after five minutes of rest."
        },
        {
            "id": "headache_probe",
            "category": "symptom_triage",
            "severity": "warning",
            "condition": {
                "type": "contains_any",
                "field": "active_symptoms",
                "any_of": ["severe headache"]
            },
            "recommendation": "Ask about headache duration and vision changes.",
            "tests": ["Blood pressure check"],
            "citation": "Escalation protocol v2"
        }
    ]"#;

    let catalog = RuleCatalog::from_json_slice(payload).expect("catalog parses");
    assert_eq!(catalog.len(), 2);

    let bp_check = catalog.rule("bp_check").expect("rule present");
    assert_eq!(bp_check.severity, Severity::High);
    assert!(matches!(bp_check.condition, Condition::Any { .. }));

    let probe = catalog.rule("headache_probe").expect("rule present");
    assert_eq!(probe.category, GuidanceCategory::SymptomTriage);
    assert_eq!(probe.severity, Severity::Medium);
    assert_eq!(probe.tests, vec!["Blood pressure check".to_string()]);
}

#[test]
fn legacy_severity_spellings_map_onto_the_scale() {
    let payload = br#"[
        {
            "id": "urgent_rule",
            "category": "general",
            "severity": "urgent",
            "condition": {"type": "compare", "field": "temperature_c", "op": "ge", "value": 38},
            "recommendation": "Treat fever."
        }
    ]"#;

    let catalog = RuleCatalog::from_json_slice(payload).expect("catalog parses");
    assert_eq!(
        catalog.rule("urgent_rule").map(|rule| rule.severity),
        Some(Severity::High)
    );
}

#[test]
fn unknown_operator_is_a_parse_error() {
    let payload = br#"[
        {
            "id": "bad_rule",
            "category": "general",
            "severity": "low",
            "condition": {"type": "compare", "field": "systolic_bp", "op": "between", "value": 1},
            "recommendation": "n/a"
        }
    ]"#;

    let error = RuleCatalog::from_json_slice(payload).expect_err("operator must be known");
    assert!(matches!(error, CatalogValidationError::Parse(_)));
}

#[test]
fn unknown_condition_type_is_a_parse_error() {
    let payload = br#"[
        {
            "id": "bad_rule",
            "category": "general",
            "severity": "low",
            "condition": {"type": "not", "conditions": []},
            "recommendation": "n/a"
        }
    ]"#;

    let error = RuleCatalog::from_json_slice(payload).expect_err("type must be known");
    assert!(matches!(error, CatalogValidationError::Parse(_)));
}

#[test]
fn unknown_severity_or_category_is_rejected() {
    let bad_severity = br#"[
        {
            "id": "bad",
            "category": "general",
            "severity": "fatal",
            "condition": {"type": "compare", "field": "x", "op": "eq", "value": 1},
            "recommendation": "n/a"
        }
    ]"#;
    assert!(matches!(
        RuleCatalog::from_json_slice(bad_severity),
        Err(CatalogValidationError::Parse(_))
    ));

    let bad_category = br#"[
        {
            "id": "bad",
            "category": "cardiology",
            "severity": "low",
            "condition": {"type": "compare", "field": "x", "op": "eq", "value": 1},
            "recommendation": "n/a"
        }
    ]"#;
    assert!(matches!(
        RuleCatalog::from_json_slice(bad_category),
        Err(CatalogValidationError::Parse(_))
    ));
}

#[test]
fn built_in_antepartum_catalog_validates() {
    let catalog = antepartum_catalog().expect("antepartum catalog validates");
    assert!(!catalog.is_empty());

    let severe = catalog.rule("bp_severe_hypertension").expect("rule present");
    assert_eq!(severe.category, GuidanceCategory::Hypertension);
    assert_eq!(severe.severity, Severity::Critical);
    assert!(!severe.medications.is_empty());

    let combo = catalog
        .rule("preeclampsia_bp_proteinuria")
        .expect("rule present");
    assert_eq!(combo.category, GuidanceCategory::Preeclampsia);
    assert_eq!(combo.severity, Severity::Critical);

    let hypertension_rules = catalog.rules_for_category(GuidanceCategory::Hypertension);
    assert_eq!(hypertension_rules.len(), 2);

    // Severe range is declared ahead of the plain hypertensive range so
    // it wins the category/severity dedup when both fire.
    let ids: Vec<&str> = catalog
        .rules()
        .iter()
        .map(|rule| rule.id.as_str())
        .collect();
    let severe_at = ids
        .iter()
        .position(|id| *id == "bp_severe_hypertension")
        .expect("severe rule listed");
    let plain_at = ids
        .iter()
        .position(|id| *id == "bp_hypertension")
        .expect("plain rule listed");
    assert!(severe_at < plain_at);
}

#[test]
fn built_in_conversational_catalog_validates() {
    let catalog = conversational_catalog().expect("conversational catalog validates");

    let sickness = catalog.rule("triage_morning_sickness").expect("rule present");
    assert_eq!(sickness.category, GuidanceCategory::Nutrition);
    assert_eq!(sickness.severity, Severity::Low);

    let bleeding = catalog.rule("triage_heavy_bleeding").expect("rule present");
    assert_eq!(bleeding.category, GuidanceCategory::Emergency);
    assert_eq!(bleeding.severity, Severity::Critical);
    assert!(bleeding.referral.is_some());
}
