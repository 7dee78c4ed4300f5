//! Shared guidance service: one engine per input shape.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::catalog::{CatalogValidationError, RuleCatalog};
use super::engine::GuidanceEngine;
use super::normalize::{
    subject_from_snapshot, subject_from_utterance, NormalizationError, PatientSnapshot,
};
use super::presets::{antepartum_catalog, conversational_catalog};
use super::views::GuidanceReportView;

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read rule catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Validation(#[from] CatalogValidationError),
}

/// Evaluates guidance for both intake shapes over immutable catalogs.
///
/// Catalogs never change after construction. Rotating rules means
/// building a replacement service and swapping the shared handle, so
/// in-flight evaluations always see one consistent catalog.
#[derive(Debug, Clone)]
pub struct GuidanceService {
    clinical: GuidanceEngine,
    triage: GuidanceEngine,
}

impl GuidanceService {
    pub fn new(clinical: RuleCatalog, triage: RuleCatalog) -> Self {
        Self {
            clinical: GuidanceEngine::new(Arc::new(clinical)),
            triage: GuidanceEngine::new(Arc::new(triage)),
        }
    }

    /// Builds the service on the built-in antepartum and conversational
    /// catalogs.
    pub fn with_default_catalogs() -> Result<Self, CatalogValidationError> {
        Ok(Self::new(antepartum_catalog()?, conversational_catalog()?))
    }

    /// Builds the service from JSON catalog files, falling back to the
    /// built-in set for any path not supplied.
    pub fn from_sources(
        clinical: Option<&Path>,
        triage: Option<&Path>,
    ) -> Result<Self, CatalogLoadError> {
        let clinical = match clinical {
            Some(path) => load_catalog(path)?,
            None => antepartum_catalog()?,
        };
        let triage = match triage {
            Some(path) => load_catalog(path)?,
            None => conversational_catalog()?,
        };
        Ok(Self::new(clinical, triage))
    }

    /// Runs the clinical catalog over a vitals snapshot.
    pub fn assess(
        &self,
        snapshot: &PatientSnapshot,
        at: DateTime<Utc>,
    ) -> Result<GuidanceReportView, NormalizationError> {
        let subject = subject_from_snapshot(snapshot)?;
        let report = self.clinical.evaluate(&subject, at);
        if report.requires_immediate_attention {
            tracing::warn!(
                matches = report.results.len(),
                "clinical assessment requires immediate attention"
            );
        }
        Ok(GuidanceReportView::from_report(&report))
    }

    /// Runs the conversational catalog over a patient message. Free
    /// text always normalizes, so this path cannot fail.
    pub fn triage(&self, message: &str, at: DateTime<Utc>) -> GuidanceReportView {
        let subject = subject_from_utterance(message);
        let report = self.triage.evaluate(&subject, at);
        if report.requires_immediate_attention {
            tracing::warn!(
                matches = report.results.len(),
                "triage guidance requires immediate attention"
            );
        }
        GuidanceReportView::from_report(&report)
    }

    pub fn clinical_catalog(&self) -> &RuleCatalog {
        self.clinical.catalog()
    }

    pub fn triage_catalog(&self) -> &RuleCatalog {
        self.triage.catalog()
    }
}

fn load_catalog(path: &Path) -> Result<RuleCatalog, CatalogLoadError> {
    let file = File::open(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RuleCatalog::from_json_reader(BufReader::new(file))?)
}
