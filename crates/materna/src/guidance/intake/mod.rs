//! CSV intake for clinic vitals exports.
//!
//! Exports arrive as one row per reading with free-form cell
//! formatting. The importer folds all rows into a single
//! [`PatientSnapshot`]: rows apply in chronological order and a later
//! non-empty cell overrides an earlier value, so the snapshot reflects
//! the most recent reading of each vital. Numeric cells stay as
//! strings; coercion is normalization's job.

mod parser;

use std::io::Read;
use std::path::Path;

use serde_json::Value;

use super::normalize::PatientSnapshot;
use parser::VitalsRecord;

#[derive(Debug)]
pub enum VitalsImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for VitalsImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VitalsImportError::Io(err) => write!(f, "failed to read vitals export: {}", err),
            VitalsImportError::Csv(err) => write!(f, "invalid vitals CSV data: {}", err),
        }
    }
}

impl std::error::Error for VitalsImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VitalsImportError::Io(err) => Some(err),
            VitalsImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for VitalsImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for VitalsImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct VitalsCsvImporter;

impl VitalsCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PatientSnapshot, VitalsImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<PatientSnapshot, VitalsImportError> {
        let mut snapshot = PatientSnapshot::default();
        for record in parser::parse_records(reader)? {
            apply_record(&mut snapshot, record);
        }
        Ok(snapshot)
    }
}

fn apply_record(snapshot: &mut PatientSnapshot, record: VitalsRecord) {
    let cells = [
        (&mut snapshot.gestational_week, record.gestational_week),
        (&mut snapshot.systolic_bp, record.systolic_bp),
        (&mut snapshot.diastolic_bp, record.diastolic_bp),
        (&mut snapshot.hemoglobin_g_dl, record.hemoglobin_g_dl),
        (&mut snapshot.blood_glucose_mg_dl, record.blood_glucose_mg_dl),
        (&mut snapshot.temperature_c, record.temperature_c),
        (
            &mut snapshot.fetal_movement_count,
            record.fetal_movement_count,
        ),
    ];
    for (slot, cell) in cells {
        if let Some(value) = cell {
            *slot = Some(Value::String(value));
        }
    }

    if let Some(flag) = record.proteinuria {
        snapshot.proteinuria = Some(flag);
    }
    if !record.symptoms.is_empty() {
        snapshot.active_symptoms = record.symptoms;
    }
    if !record.complications.is_empty() {
        snapshot.complications = record.complications;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    #[test]
    fn parse_datetime_supports_rfc3339_and_date_strings() {
        let rfc = parser::parse_datetime_for_tests("2026-02-10T09:30:00Z").expect("parse rfc");
        assert_eq!(
            rfc,
            NaiveDate::from_ymd_opt(2026, 2, 10)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap()
        );

        let date = parser::parse_datetime_for_tests("2026-02-10").expect("parse date");
        assert_eq!(
            date,
            NaiveDate::from_ymd_opt(2026, 2, 10)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );

        assert!(parser::parse_datetime_for_tests("  ").is_none());
        assert!(parser::parse_datetime_for_tests("not-a-date").is_none());
    }

    #[test]
    fn parse_flag_recognizes_clinical_spellings() {
        assert_eq!(parser::parse_flag_for_tests("Yes"), Some(true));
        assert_eq!(parser::parse_flag_for_tests("positive"), Some(true));
        assert_eq!(parser::parse_flag_for_tests("+"), Some(true));
        assert_eq!(parser::parse_flag_for_tests("NEG"), Some(false));
        assert_eq!(parser::parse_flag_for_tests("0"), Some(false));
        assert_eq!(parser::parse_flag_for_tests("trace"), None);
    }

    #[test]
    fn importer_builds_snapshot_from_a_single_row() {
        let csv = "Recorded At,Gestational Week,Systolic BP,Diastolic BP,Proteinuria,Symptoms\n\
2026-02-10T09:00:00Z,38,152,98,positive,severe headache; blurred vision\n";
        let snapshot = VitalsCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(snapshot.gestational_week, Some(Value::String("38".into())));
        assert_eq!(snapshot.systolic_bp, Some(Value::String("152".into())));
        assert_eq!(snapshot.diastolic_bp, Some(Value::String("98".into())));
        assert_eq!(snapshot.proteinuria, Some(true));
        assert_eq!(
            snapshot.active_symptoms,
            vec!["severe headache".to_string(), "blurred vision".to_string()]
        );
        assert!(snapshot.complications.is_empty());
    }

    #[test]
    fn importer_applies_rows_in_chronological_order() {
        // Rows arrive newest first; the blank hemoglobin cell in the
        // newer row must not erase the earlier reading.
        let csv = "Recorded At,Systolic BP,Diastolic BP,Hemoglobin g/dL\n\
2026-02-10T09:00:00Z,152,98,\n\
2026-02-08T09:00:00Z,128,82,10.9\n";
        let snapshot = VitalsCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(snapshot.systolic_bp, Some(Value::String("152".into())));
        assert_eq!(snapshot.diastolic_bp, Some(Value::String("98".into())));
        assert_eq!(snapshot.hemoglobin_g_dl, Some(Value::String("10.9".into())));
    }

    #[test]
    fn importer_ignores_unknown_columns() {
        let csv = "Recorded At,Clinic,Systolic BP\n2026-02-10,Downtown,140\n";
        let snapshot = VitalsCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(snapshot.systolic_bp, Some(Value::String("140".into())));
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = VitalsCsvImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            VitalsImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
