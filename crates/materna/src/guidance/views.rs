use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{GuidanceCategory, Severity};
use super::engine::{GuidanceMatch, GuidanceReport};

#[derive(Debug, Clone, Serialize)]
pub struct GuidanceResultView {
    pub rule_id: String,
    pub category: GuidanceCategory,
    pub category_label: &'static str,
    pub severity: Severity,
    pub severity_label: &'static str,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub medications: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    pub matched_at: DateTime<Utc>,
}

impl GuidanceResultView {
    pub fn from_match(result: &GuidanceMatch<'_>) -> Self {
        Self {
            rule_id: result.rule.id.clone(),
            category: result.rule.category,
            category_label: result.rule.category.label(),
            severity: result.rule.severity,
            severity_label: result.rule.severity.label(),
            recommendation: result.rule.recommendation.clone(),
            medications: result.rule.medications.clone(),
            tests: result.rule.tests.clone(),
            referral: result.rule.referral.clone(),
            citation: result.rule.citation.clone(),
            matched_at: result.matched_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GuidanceReportView {
    pub results: Vec<GuidanceResultView>,
    pub requires_immediate_attention: bool,
    pub evaluated_at: DateTime<Utc>,
}

impl GuidanceReportView {
    pub fn from_report(report: &GuidanceReport<'_>) -> Self {
        Self {
            results: report
                .results
                .iter()
                .map(GuidanceResultView::from_match)
                .collect(),
            requires_immediate_attention: report.requires_immediate_attention,
            evaluated_at: report.evaluated_at,
        }
    }
}
