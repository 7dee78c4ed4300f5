//! Rule evaluation over a normalized subject.
//!
//! The engine walks its catalog in declaration order, keeps the first
//! match per `(category, severity)` pair, then ranks the survivors by
//! severity. The sort is stable, so rules of equal severity keep their
//! catalog order. Matches borrow their rules from the catalog; the
//! report is a view over the engine, not a copy of it.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::catalog::{Rule, RuleCatalog};
use super::subject::EvaluationSubject;

#[derive(Debug, Clone)]
pub struct GuidanceEngine {
    catalog: Arc<RuleCatalog>,
}

/// One matched rule, stamped with the evaluation time.
#[derive(Debug, Clone, Serialize)]
pub struct GuidanceMatch<'a> {
    pub rule: &'a Rule,
    pub matched_at: DateTime<Utc>,
}

/// Ranked outcome of a single evaluation pass.
#[derive(Debug, Clone, Serialize)]
pub struct GuidanceReport<'a> {
    pub results: Vec<GuidanceMatch<'a>>,
    pub requires_immediate_attention: bool,
    pub evaluated_at: DateTime<Utc>,
}

impl GuidanceEngine {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Evaluates every rule against the subject. The timestamp is
    /// caller-supplied so the pass itself stays pure and repeatable.
    pub fn evaluate<'a>(
        &'a self,
        subject: &EvaluationSubject,
        at: DateTime<Utc>,
    ) -> GuidanceReport<'a> {
        let mut results = Vec::new();
        let mut seen = BTreeSet::new();

        for rule in self.catalog.rules() {
            if !rule.condition.matches(subject) {
                continue;
            }
            // First rule wins within a (category, severity) pair.
            if !seen.insert((rule.category, rule.severity)) {
                continue;
            }
            results.push(GuidanceMatch {
                rule,
                matched_at: at,
            });
        }

        results.sort_by(|a, b| b.rule.severity.cmp(&a.rule.severity));
        let requires_immediate_attention = results
            .iter()
            .any(|result| result.rule.severity.escalates());

        GuidanceReport {
            results,
            requires_immediate_attention,
            evaluated_at: at,
        }
    }
}
