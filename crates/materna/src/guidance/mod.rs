//! Guidance evaluation pipeline: raw input is normalized into a typed
//! subject, matched against an immutable rule catalog, and returned as a
//! deduplicated, severity-ranked report.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod intake;
pub mod normalize;
pub mod predicate;
pub mod presets;
pub mod router;
pub mod service;
pub mod subject;
pub mod views;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogValidationError, Rule, RuleCatalog};
pub use domain::{GuidanceCategory, Severity};
pub use engine::{GuidanceEngine, GuidanceMatch, GuidanceReport};
pub use intake::{VitalsCsvImporter, VitalsImportError};
pub use normalize::{
    normalize, subject_from_snapshot, subject_from_utterance, GuidanceInput, NormalizationError,
    PatientSnapshot,
};
pub use predicate::{Comparator, Condition, ScalarValue};
pub use presets::{antepartum_catalog, conversational_catalog};
pub use router::guidance_router;
pub use service::{CatalogLoadError, GuidanceService};
pub use subject::{EvaluationSubject, FieldValue};
pub use views::{GuidanceReportView, GuidanceResultView};
