//! Field-level validation for todo creation and update payloads.
//!
//! Payloads arrive as untyped JSON objects. Every field is checked
//! independently and all violations are collected; a typed value is only
//! produced when the whole payload is clean.

pub mod evaluator;
pub mod rules;

pub use evaluator::{validate_create, validate_update};
pub use rules::FieldViolation;
