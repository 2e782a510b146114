//! Violation type and rule identifiers.

use serde::{Deserialize, Serialize};

pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_DUE: &str = "due";
pub const FIELD_DONE: &str = "done";
pub const FIELD_PRIORITY: &str = "priority";

/// Every field a creation or update payload may carry.
pub const KNOWN_FIELDS: &[&str] = &[
    FIELD_TITLE,
    FIELD_DESCRIPTION,
    FIELD_DUE,
    FIELD_DONE,
    FIELD_PRIORITY,
];

pub const RULE_REQUIRED: &str = "required";
pub const RULE_NOT_NULL: &str = "not_null";
pub const RULE_TYPE: &str = "type";
pub const RULE_NOT_EMPTY: &str = "not_empty";
pub const RULE_MAX_LENGTH: &str = "max_length";
pub const RULE_RANGE: &str = "range";
pub const RULE_FUTURE_DATE: &str = "future_date";
pub const RULE_UNKNOWN_FIELD: &str = "unknown_field";

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, rule: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Flatten `validator` errors into field violations.
pub fn from_validator(errors: &validator::ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldViolation {
                field: field.to_string(),
                rule: err.code.to_string(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid")),
            })
        })
        .collect();
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}
