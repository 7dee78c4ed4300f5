use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::subject::{canonical_term, EvaluationSubject, FieldValue};

/// Comparison operator for `compare` conditions. The set is closed; a rule
/// file naming any other operator fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparator {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
        }
    }
}

/// Literal operand of a `compare` condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

/// Predicate tree evaluated against an [`EvaluationSubject`].
///
/// A condition referencing a field the subject does not carry evaluates to
/// no-match rather than erroring: partial clinical data is the common case
/// and must never abort guidance generation. Type mismatches between the
/// held value and the literal degrade the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    Compare {
        field: String,
        op: Comparator,
        value: ScalarValue,
    },
    ContainsAny {
        field: String,
        any_of: Vec<String>,
    },
    All {
        conditions: Vec<Condition>,
    },
    Any {
        conditions: Vec<Condition>,
    },
}

impl Condition {
    pub fn matches(&self, subject: &EvaluationSubject) -> bool {
        match self {
            Condition::Compare { field, op, value } => subject
                .value(field)
                .map(|held| compare(held, *op, value))
                .unwrap_or(false),
            Condition::ContainsAny { field, any_of } => subject
                .value(field)
                .map(|held| contains_any(held, any_of))
                .unwrap_or(false),
            Condition::All { conditions } => {
                !conditions.is_empty() && conditions.iter().all(|nested| nested.matches(subject))
            }
            Condition::Any { conditions } => {
                conditions.iter().any(|nested| nested.matches(subject))
            }
        }
    }
}

fn compare(held: &FieldValue, op: Comparator, literal: &ScalarValue) -> bool {
    match (held, literal) {
        (FieldValue::Number(actual), ScalarValue::Number(expected)) => actual
            .partial_cmp(expected)
            .map(|ordering| op.accepts(ordering))
            .unwrap_or(false),
        (FieldValue::Text(actual), ScalarValue::Text(expected)) => {
            op.accepts(actual.as_str().cmp(expected.as_str()))
        }
        (FieldValue::Flag(actual), ScalarValue::Flag(expected)) => match op {
            Comparator::Eq => actual == expected,
            Comparator::Ne => actual != expected,
            _ => false,
        },
        _ => false,
    }
}

fn contains_any(held: &FieldValue, needles: &[String]) -> bool {
    needles.iter().any(|needle| {
        let needle = canonical_term(needle);
        if needle.is_empty() {
            return false;
        }
        match held {
            FieldValue::Terms(terms) => terms.contains(&needle),
            FieldValue::Text(text) => text.contains(&needle),
            _ => false,
        }
    })
}
