//! Persistence contract consumed by the lifecycle service.
//!
//! [`TodoStore`] is implemented by the PostgreSQL store in `todo-db` and by
//! [`MemoryTodoStore`] for tests and local runs.

pub mod memory;

use async_trait::async_trait;

use crate::query::TodoQuery;
use crate::todo::{NewTodo, Todo, TodoPatch};
use crate::types::{DbId, Timestamp};

pub use memory::MemoryTodoStore;

/// Error raised by a storage backend. The source is kept intact so callers
/// see exactly what the backend reported.
#[derive(Debug, thiserror::Error)]
#[error("Storage error: {source}")]
pub struct StoreError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl StoreError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The backend error, for downcasting.
    pub fn backend(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One page of matches plus the total number of matches across all pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub items: Vec<Todo>,
    pub total: u64,
}

/// Single-record CRUD plus filtered, sorted, windowed listing.
///
/// Every call is one storage round-trip; nothing spans calls.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Persist a new record. Storage assigns the id; both timestamps are `now`.
    async fn insert(&self, input: NewTodo, now: Timestamp) -> StoreResult<Todo>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Todo>>;

    /// Apply the supplied fields and set `updated_at`. Returns `false` when
    /// no record with `id` exists.
    async fn update(&self, id: DbId, patch: &TodoPatch, now: Timestamp) -> StoreResult<bool>;

    /// Permanently remove a record. Returns `false` when nothing was removed.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;

    /// Run a composed query, returning the requested window and the total
    /// match count.
    async fn query(&self, query: &TodoQuery) -> StoreResult<QueryResult>;

    async fn health_check(&self) -> StoreResult<()>;
}
