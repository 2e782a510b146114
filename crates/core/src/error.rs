use crate::store::StoreError;
use crate::validation::FieldViolation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// One or more payload fields violated their constraints.
    #[error("Validation failed: {} invalid field(s)", .0.len())]
    InvalidFields(Vec<FieldViolation>),

    /// Propagated unmodified from the persistence collaborator.
    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing todo record.
    pub fn todo_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "Todo",
            id: id.to_string(),
        }
    }
}
