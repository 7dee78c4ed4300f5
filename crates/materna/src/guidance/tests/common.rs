use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::guidance::catalog::{Rule, RuleCatalog};
use crate::guidance::domain::{GuidanceCategory, Severity};
use crate::guidance::normalize::PatientSnapshot;
use crate::guidance::predicate::{Comparator, Condition, ScalarValue};
use crate::guidance::router::guidance_router;
use crate::guidance::service::GuidanceService;
use crate::guidance::subject::fields;

pub(super) fn evaluation_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn rule(
    id: &str,
    category: GuidanceCategory,
    severity: Severity,
    condition: Condition,
) -> Rule {
    Rule {
        id: id.to_string(),
        category,
        severity,
        condition,
        recommendation: format!("guidance for {id}"),
        medications: Vec::new(),
        tests: Vec::new(),
        referral: None,
        citation: None,
    }
}

pub(super) fn at_least(field: &str, threshold: f64) -> Condition {
    Condition::Compare {
        field: field.to_string(),
        op: Comparator::Ge,
        value: ScalarValue::Number(threshold),
    }
}

pub(super) fn below(field: &str, threshold: f64) -> Condition {
    Condition::Compare {
        field: field.to_string(),
        op: Comparator::Lt,
        value: ScalarValue::Number(threshold),
    }
}

pub(super) fn flag_true(field: &str) -> Condition {
    Condition::Compare {
        field: field.to_string(),
        op: Comparator::Eq,
        value: ScalarValue::Flag(true),
    }
}

pub(super) fn has_any(field: &str, needles: &[&str]) -> Condition {
    Condition::ContainsAny {
        field: field.to_string(),
        any_of: needles.iter().map(|needle| needle.to_string()).collect(),
    }
}

fn elevated_bp() -> Condition {
    Condition::Any {
        conditions: vec![
            at_least(fields::SYSTOLIC_BP, 140.0),
            at_least(fields::DIASTOLIC_BP, 90.0),
        ],
    }
}

pub(super) fn sample_catalog() -> RuleCatalog {
    RuleCatalog::new(vec![
        rule(
            "hypertension_bp",
            GuidanceCategory::Hypertension,
            Severity::High,
            elevated_bp(),
        ),
        rule(
            "anemia_hemoglobin",
            GuidanceCategory::Anemia,
            Severity::Medium,
            below(fields::HEMOGLOBIN_G_DL, 11.0),
        ),
        rule(
            "preeclampsia_bp_proteinuria",
            GuidanceCategory::Preeclampsia,
            Severity::Critical,
            Condition::All {
                conditions: vec![elevated_bp(), flag_true(fields::PROTEINURIA)],
            },
        ),
        rule(
            "fetal_movement_low",
            GuidanceCategory::FetalMovement,
            Severity::High,
            below(fields::FETAL_MOVEMENT_COUNT, 10.0),
        ),
        rule(
            "term_with_complication",
            GuidanceCategory::GestationalTiming,
            Severity::High,
            Condition::All {
                conditions: vec![
                    at_least(fields::GESTATIONAL_WEEK, 37.0),
                    has_any(fields::COMPLICATIONS, &["pre-eclampsia"]),
                ],
            },
        ),
    ])
    .expect("valid catalog")
}

pub(super) fn scenario_snapshot() -> PatientSnapshot {
    PatientSnapshot {
        gestational_week: Some(json!(38)),
        systolic_bp: Some(json!(152)),
        diastolic_bp: Some(json!(98)),
        proteinuria: Some(true),
        complications: vec!["Pre-eclampsia".to_string()],
        ..PatientSnapshot::default()
    }
}

pub(super) fn service() -> GuidanceService {
    GuidanceService::with_default_catalogs().expect("built-in catalogs validate")
}

pub(super) fn guidance_router_with_service(service: GuidanceService) -> axum::Router {
    guidance_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
