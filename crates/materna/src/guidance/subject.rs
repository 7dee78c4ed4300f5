use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Canonical field names produced by the normalizer and referenced by rule
/// conditions.
pub mod fields {
    pub const GESTATIONAL_WEEK: &str = "gestational_week";
    pub const SYSTOLIC_BP: &str = "systolic_bp";
    pub const DIASTOLIC_BP: &str = "diastolic_bp";
    pub const HEMOGLOBIN_G_DL: &str = "hemoglobin_g_dl";
    pub const BLOOD_GLUCOSE_MG_DL: &str = "blood_glucose_mg_dl";
    pub const TEMPERATURE_C: &str = "temperature_c";
    pub const FETAL_MOVEMENT_COUNT: &str = "fetal_movement_count";
    pub const PROTEINURIA: &str = "proteinuria";
    pub const ACTIVE_SYMPTOMS: &str = "active_symptoms";
    pub const COMPLICATIONS: &str = "complications";
    pub const FREE_TEXT: &str = "free_text";
    pub const FREE_TEXT_TOKENS: &str = "free_text_tokens";
}

/// Typed value held by one subject field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Flag(bool),
    Terms(BTreeSet<String>),
}

/// Flat mapping of named fields built once per evaluation call.
///
/// Fields absent from the raw input are simply not present here, so a
/// condition referencing them fails to match instead of comparing against a
/// placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationSubject {
    fields: BTreeMap<String, FieldValue>,
}

impl EvaluationSubject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_number(&mut self, name: &str, value: f64) {
        self.fields
            .insert(name.to_string(), FieldValue::Number(value));
    }

    pub fn insert_text(&mut self, name: &str, value: impl Into<String>) {
        self.fields
            .insert(name.to_string(), FieldValue::Text(value.into()));
    }

    pub fn insert_flag(&mut self, name: &str, value: bool) {
        self.fields.insert(name.to_string(), FieldValue::Flag(value));
    }

    pub fn insert_terms(&mut self, name: &str, values: BTreeSet<String>) {
        self.fields
            .insert(name.to_string(), FieldValue::Terms(values));
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Collapse a symptom, complication, or message into its canonical matching
/// form: zero-width characters stripped, whitespace runs collapsed,
/// lower-cased.
pub(crate) fn canonical_term(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_term_strips_noise_and_case() {
        assert_eq!(
            canonical_term("\u{feff}  Severe   Headache "),
            "severe headache"
        );
        assert_eq!(canonical_term("   "), "");
    }

    #[test]
    fn subject_fields_overwrite_by_name() {
        let mut subject = EvaluationSubject::new();
        subject.insert_number(fields::SYSTOLIC_BP, 120.0);
        subject.insert_number(fields::SYSTOLIC_BP, 152.0);

        assert_eq!(subject.len(), 1);
        assert_eq!(
            subject.value(fields::SYSTOLIC_BP),
            Some(&FieldValue::Number(152.0))
        );
        assert!(subject.value(fields::DIASTOLIC_BP).is_none());
    }
}
