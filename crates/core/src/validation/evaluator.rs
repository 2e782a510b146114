//! Payload evaluator: pure logic, no storage access.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use super::rules::*;
use crate::todo::{
    NewTodo, Priority, TodoPatch, DESCRIPTION_MAX_CHARS, PRIORITY_MAX, PRIORITY_MIN,
    TITLE_MAX_CHARS,
};
use crate::types::{truncate, Timestamp};

/// Validate a creation payload. `title` and `description` are mandatory;
/// omitted optional fields take their defaults.
pub fn validate_create(
    body: &Map<String, Value>,
    now: Timestamp,
) -> Result<NewTodo, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    reject_unknown_fields(body, &mut violations);
    require(body, FIELD_TITLE, &mut violations);
    require(body, FIELD_DESCRIPTION, &mut violations);

    let title = text_field(body, FIELD_TITLE, TITLE_MAX_CHARS, &mut violations);
    let description = text_field(body, FIELD_DESCRIPTION, DESCRIPTION_MAX_CHARS, &mut violations);
    let due = due_field(body, now, &mut violations);
    let done = bool_field(body, FIELD_DONE, &mut violations);
    let priority = priority_field(body, &mut violations);

    match (title, description) {
        (Some(title), Some(description)) if violations.is_empty() => Ok(NewTodo {
            title,
            description,
            due: due.flatten(),
            done: done.unwrap_or(false),
            priority: priority.unwrap_or_default(),
        }),
        _ => Err(violations),
    }
}

/// Validate a partial update payload. Every field is optional.
pub fn validate_update(
    body: &Map<String, Value>,
    now: Timestamp,
) -> Result<TodoPatch, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    reject_unknown_fields(body, &mut violations);

    let patch = TodoPatch {
        title: text_field(body, FIELD_TITLE, TITLE_MAX_CHARS, &mut violations),
        description: text_field(body, FIELD_DESCRIPTION, DESCRIPTION_MAX_CHARS, &mut violations),
        due: due_field(body, now, &mut violations),
        done: bool_field(body, FIELD_DONE, &mut violations),
        priority: priority_field(body, &mut violations),
    };

    if violations.is_empty() {
        Ok(patch)
    } else {
        Err(violations)
    }
}

fn reject_unknown_fields(body: &Map<String, Value>, violations: &mut Vec<FieldViolation>) {
    for key in body.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            violations.push(FieldViolation::new(
                key,
                RULE_UNKNOWN_FIELD,
                format!("property {key} should not exist"),
            ));
        }
    }
}

fn require(body: &Map<String, Value>, field: &str, violations: &mut Vec<FieldViolation>) {
    if !body.contains_key(field) {
        violations.push(FieldViolation::new(
            field,
            RULE_REQUIRED,
            format!("{field} should not be empty"),
        ));
    }
}

fn not_null(field: &str) -> FieldViolation {
    FieldViolation::new(field, RULE_NOT_NULL, format!("{field} must not be null"))
}

fn text_field(
    body: &Map<String, Value>,
    field: &str,
    max_chars: usize,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match body.get(field)? {
        Value::String(s) if s.is_empty() => {
            violations.push(FieldViolation::new(
                field,
                RULE_NOT_EMPTY,
                format!("{field} should not be empty"),
            ));
            None
        }
        Value::String(s) if s.chars().count() > max_chars => {
            violations.push(FieldViolation::new(
                field,
                RULE_MAX_LENGTH,
                format!("{field} must be shorter than or equal to {max_chars} characters"),
            ));
            None
        }
        Value::String(s) => Some(s.clone()),
        Value::Null => {
            violations.push(not_null(field));
            None
        }
        _ => {
            violations.push(FieldViolation::new(
                field,
                RULE_TYPE,
                format!("{field} must be a string"),
            ));
            None
        }
    }
}

/// `Some(None)` means an explicit `null` (no due date / clear it).
fn due_field(
    body: &Map<String, Value>,
    now: Timestamp,
    violations: &mut Vec<FieldViolation>,
) -> Option<Option<Timestamp>> {
    match body.get(FIELD_DUE)? {
        Value::Null => Some(None),
        Value::String(raw) => match parse_due(raw) {
            Some(parsed) => {
                let due = truncate(parsed);
                if due > now {
                    Some(Some(due))
                } else {
                    violations.push(FieldViolation::new(
                        FIELD_DUE,
                        RULE_FUTURE_DATE,
                        "Due date must be future date",
                    ));
                    None
                }
            }
            None => {
                violations.push(FieldViolation::new(
                    FIELD_DUE,
                    RULE_TYPE,
                    "Due date must be an ISO-8601 date-time",
                ));
                None
            }
        },
        _ => {
            violations.push(FieldViolation::new(
                FIELD_DUE,
                RULE_TYPE,
                "Due date must be an ISO-8601 date-time",
            ));
            None
        }
    }
}

/// ISO-8601 date-time with offset, local date-time, or bare date. Forms
/// without an offset are read as UTC; a bare date means midnight.
fn parse_due(raw: &str) -> Option<Timestamp> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn bool_field(
    body: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<bool> {
    match body.get(field)? {
        Value::Bool(b) => Some(*b),
        Value::Null => {
            violations.push(not_null(field));
            None
        }
        _ => {
            violations.push(FieldViolation::new(
                field,
                RULE_TYPE,
                format!("{field} must be a boolean value"),
            ));
            None
        }
    }
}

fn priority_field(
    body: &Map<String, Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<Priority> {
    let out_of_range = || {
        FieldViolation::new(
            FIELD_PRIORITY,
            RULE_RANGE,
            format!("priority must be between {PRIORITY_MIN} and {PRIORITY_MAX}"),
        )
    };

    match body.get(FIELD_PRIORITY)? {
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            let priority = n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .and_then(Priority::new);
            if priority.is_none() {
                violations.push(out_of_range());
            }
            priority
        }
        Value::Null => {
            violations.push(not_null(FIELD_PRIORITY));
            None
        }
        _ => {
            violations.push(FieldViolation::new(
                FIELD_PRIORITY,
                RULE_TYPE,
                "priority must be an integer number",
            ));
            None
        }
    }
}
