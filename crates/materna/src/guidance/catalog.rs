use std::collections::BTreeSet;
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::domain::{GuidanceCategory, Severity};
use super::predicate::Condition;

/// One declarative guidance rule: a condition over subject fields paired
/// with the recommendation surfaced when it matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub category: GuidanceCategory,
    pub severity: Severity,
    pub condition: Condition,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medications: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
}

/// Raised while sealing a catalog. Fatal at startup: an engine must never
/// serve evaluations against a catalog that failed validation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogValidationError {
    #[error("rule id must not be blank")]
    BlankRuleId,
    #[error("duplicate rule id '{rule_id}'")]
    DuplicateRuleId { rule_id: String },
    #[error("rule '{rule_id}' has an empty condition group")]
    EmptyCondition { rule_id: String },
    #[error("rule '{rule_id}' references a blank field name")]
    BlankField { rule_id: String },
    #[error("rule '{rule_id}' has a contains_any condition without usable needles")]
    EmptyNeedles { rule_id: String },
    #[error("rule '{rule_id}' has a blank recommendation")]
    BlankRecommendation { rule_id: String },
    #[error("rule catalog could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable, validated collection of rules. Declaration order is preserved
/// and meaningful: it is the tie-break for equal-severity results.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Validate and seal a rule set. There is no mutation API; replacing
    /// rules means building a new catalog.
    pub fn new(rules: Vec<Rule>) -> Result<Self, CatalogValidationError> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();

        for rule in &rules {
            let rule_id = rule.id.trim();
            if rule_id.is_empty() {
                return Err(CatalogValidationError::BlankRuleId);
            }
            if !seen.insert(rule_id) {
                return Err(CatalogValidationError::DuplicateRuleId {
                    rule_id: rule_id.to_string(),
                });
            }
            if rule.recommendation.trim().is_empty() {
                return Err(CatalogValidationError::BlankRecommendation {
                    rule_id: rule_id.to_string(),
                });
            }
            validate_condition(&rule.condition, rule_id)?;
        }

        Ok(Self { rules })
    }

    /// Load and validate a catalog from a JSON array of rules.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CatalogValidationError> {
        let rules: Vec<Rule> = serde_json::from_slice(bytes)?;
        Self::new(rules)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogValidationError> {
        let rules: Vec<Rule> = serde_json::from_reader(reader)?;
        Self::new(rules)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn rules_for_category(&self, category: GuidanceCategory) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.category == category)
            .collect()
    }
}

fn validate_condition(condition: &Condition, rule_id: &str) -> Result<(), CatalogValidationError> {
    match condition {
        Condition::Compare { field, .. } => {
            if field.trim().is_empty() {
                return Err(CatalogValidationError::BlankField {
                    rule_id: rule_id.to_string(),
                });
            }
            Ok(())
        }
        Condition::ContainsAny { field, any_of } => {
            if field.trim().is_empty() {
                return Err(CatalogValidationError::BlankField {
                    rule_id: rule_id.to_string(),
                });
            }
            if any_of.iter().all(|needle| needle.trim().is_empty()) {
                return Err(CatalogValidationError::EmptyNeedles {
                    rule_id: rule_id.to_string(),
                });
            }
            Ok(())
        }
        Condition::All { conditions } | Condition::Any { conditions } => {
            if conditions.is_empty() {
                return Err(CatalogValidationError::EmptyCondition {
                    rule_id: rule_id.to_string(),
                });
            }
            for nested in conditions {
                validate_condition(nested, rule_id)?;
            }
            Ok(())
        }
    }
}
