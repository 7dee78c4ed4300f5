//! Turns raw guidance input into a flat [`EvaluationSubject`].
//!
//! Two shapes come in: a structured vitals snapshot from the clinical
//! intake path, or a free-text patient message from chat. Snapshot
//! fields may arrive as JSON numbers or as numeric strings (vitals
//! exports quote everything), so coercion happens here and nowhere
//! else. A field that is absent or blank is simply left out of the
//! subject; only a present, non-coercible value is an error.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::subject::{canonical_term, fields, EvaluationSubject};

/// Vitals snapshot as captured by intake. Every field is optional;
/// numeric cells stay as raw JSON values until normalization coerces
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PatientSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gestational_week: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub systolic_bp: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diastolic_bp: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hemoglobin_g_dl: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_glucose_mg_dl: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetal_movement_count: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proteinuria: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub active_symptoms: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub complications: Vec<String>,
}

/// A snapshot field that was present but could not become a number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizationError {
    #[error("field '{field}' must be numeric, got '{value}'")]
    NotNumeric { field: &'static str, value: String },
    #[error("field '{field}' must be a finite number, got '{value}'")]
    NotFinite { field: &'static str, value: String },
}

impl NormalizationError {
    /// Name of the offending snapshot field, for API error payloads.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NotNumeric { field, .. } | Self::NotFinite { field, .. } => field,
        }
    }
}

/// The two input shapes the engine evaluates.
#[derive(Debug, Clone, PartialEq)]
pub enum GuidanceInput {
    Snapshot(PatientSnapshot),
    Utterance(String),
}

pub fn normalize(input: &GuidanceInput) -> Result<EvaluationSubject, NormalizationError> {
    match input {
        GuidanceInput::Snapshot(snapshot) => subject_from_snapshot(snapshot),
        GuidanceInput::Utterance(message) => Ok(subject_from_utterance(message)),
    }
}

/// Coerces a snapshot into a subject. Fails only when a present value
/// resists numeric coercion; the error names the field so callers can
/// point at the bad cell.
pub fn subject_from_snapshot(
    snapshot: &PatientSnapshot,
) -> Result<EvaluationSubject, NormalizationError> {
    let mut subject = EvaluationSubject::new();

    let numeric_fields = [
        (fields::GESTATIONAL_WEEK, &snapshot.gestational_week),
        (fields::SYSTOLIC_BP, &snapshot.systolic_bp),
        (fields::DIASTOLIC_BP, &snapshot.diastolic_bp),
        (fields::HEMOGLOBIN_G_DL, &snapshot.hemoglobin_g_dl),
        (fields::BLOOD_GLUCOSE_MG_DL, &snapshot.blood_glucose_mg_dl),
        (fields::TEMPERATURE_C, &snapshot.temperature_c),
        (fields::FETAL_MOVEMENT_COUNT, &snapshot.fetal_movement_count),
    ];
    for (name, raw) in numeric_fields {
        if let Some(value) = numeric_field(name, raw)? {
            subject.insert_number(name, value);
        }
    }

    if let Some(flag) = snapshot.proteinuria {
        subject.insert_flag(fields::PROTEINURIA, flag);
    }

    let symptoms = term_set(&snapshot.active_symptoms);
    if !symptoms.is_empty() {
        subject.insert_terms(fields::ACTIVE_SYMPTOMS, symptoms);
    }
    let complications = term_set(&snapshot.complications);
    if !complications.is_empty() {
        subject.insert_terms(fields::COMPLICATIONS, complications);
    }

    Ok(subject)
}

/// Builds a subject from a chat message. Never fails: the collapsed
/// lowercase phrase and its token set are derived from whatever text
/// came in, and an all-noise message just yields an emptier subject.
pub fn subject_from_utterance(message: &str) -> EvaluationSubject {
    let mut subject = EvaluationSubject::new();
    let lowered = canonical_term(message);

    let tokens: BTreeSet<String> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect();

    subject.insert_text(fields::FREE_TEXT, lowered);
    if !tokens.is_empty() {
        subject.insert_terms(fields::FREE_TEXT_TOKENS, tokens);
    }
    subject
}

fn numeric_field(
    field: &'static str,
    raw: &Option<Value>,
) -> Result<Option<f64>, NormalizationError> {
    let Some(value) = raw else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => match number.as_f64() {
            Some(parsed) if parsed.is_finite() => Ok(Some(parsed)),
            Some(parsed) => Err(NormalizationError::NotFinite {
                field,
                value: parsed.to_string(),
            }),
            None => Err(NormalizationError::NotNumeric {
                field,
                value: number.to_string(),
            }),
        },
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            match trimmed.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
                Ok(_) => Err(NormalizationError::NotFinite {
                    field,
                    value: trimmed.to_string(),
                }),
                Err(_) => Err(NormalizationError::NotNumeric {
                    field,
                    value: trimmed.to_string(),
                }),
            }
        }
        other => Err(NormalizationError::NotNumeric {
            field,
            value: other.to_string(),
        }),
    }
}

fn term_set(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|value| canonical_term(value))
        .filter(|term| !term.is_empty())
        .collect()
}
