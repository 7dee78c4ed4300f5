use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct VitalsRecord {
    pub(crate) recorded_at: Option<NaiveDateTime>,
    pub(crate) gestational_week: Option<String>,
    pub(crate) systolic_bp: Option<String>,
    pub(crate) diastolic_bp: Option<String>,
    pub(crate) hemoglobin_g_dl: Option<String>,
    pub(crate) blood_glucose_mg_dl: Option<String>,
    pub(crate) temperature_c: Option<String>,
    pub(crate) fetal_movement_count: Option<String>,
    pub(crate) proteinuria: Option<bool>,
    pub(crate) symptoms: Vec<String>,
    pub(crate) complications: Vec<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<VitalsRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<VitalsRow>() {
        let row = record?;
        records.push(VitalsRecord {
            recorded_at: row.recorded_at.as_deref().and_then(parse_datetime),
            gestational_week: row.gestational_week,
            systolic_bp: row.systolic_bp,
            diastolic_bp: row.diastolic_bp,
            hemoglobin_g_dl: row.hemoglobin_g_dl,
            blood_glucose_mg_dl: row.blood_glucose_mg_dl,
            temperature_c: row.temperature_c,
            fetal_movement_count: row.fetal_movement_count,
            proteinuria: row.proteinuria.as_deref().and_then(parse_flag),
            symptoms: row.symptoms.as_deref().map(split_terms).unwrap_or_default(),
            complications: row
                .complications
                .as_deref()
                .map(split_terms)
                .unwrap_or_default(),
        });
    }

    // Undated rows sort first so any dated reading overrides them.
    records.sort_by_key(|record| record.recorded_at);
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct VitalsRow {
    #[serde(
        rename = "Recorded At",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    recorded_at: Option<String>,
    #[serde(
        rename = "Gestational Week",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    gestational_week: Option<String>,
    #[serde(
        rename = "Systolic BP",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    systolic_bp: Option<String>,
    #[serde(
        rename = "Diastolic BP",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    diastolic_bp: Option<String>,
    #[serde(
        rename = "Hemoglobin g/dL",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    hemoglobin_g_dl: Option<String>,
    #[serde(
        rename = "Blood Glucose mg/dL",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    blood_glucose_mg_dl: Option<String>,
    #[serde(
        rename = "Temperature C",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    temperature_c: Option<String>,
    #[serde(
        rename = "Fetal Movement Count",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    fetal_movement_count: Option<String>,
    #[serde(
        rename = "Proteinuria",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    proteinuria: Option<String>,
    #[serde(rename = "Symptoms", default, deserialize_with = "empty_string_as_none")]
    symptoms: Option<String>,
    #[serde(
        rename = "Complications",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    complications: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "positive" | "pos" | "1" | "+" => Some(true),
        "false" | "no" | "n" | "negative" | "neg" | "0" | "-" => Some(false),
        _ => None,
    }
}

fn split_terms(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) fn parse_datetime_for_tests(value: &str) -> Option<NaiveDateTime> {
    parse_datetime(value)
}

#[cfg(test)]
pub(crate) fn parse_flag_for_tests(value: &str) -> Option<bool> {
    parse_flag(value)
}
