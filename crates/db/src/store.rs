//! [`TodoStore`] implementation over a PostgreSQL pool.

use async_trait::async_trait;
use todo_core::query::TodoQuery;
use todo_core::store::{QueryResult, StoreError, StoreResult, TodoStore};
use todo_core::todo::{NewTodo, Todo, TodoPatch};
use todo_core::types::{DbId, Timestamp};

use crate::repositories::TodoRepo;
use crate::DbPool;

/// PostgreSQL-backed todo store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: DbPool,
}

impl PgTodoStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn storage(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Todo storage call failed");
    StoreError::new(err)
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn insert(&self, input: NewTodo, now: Timestamp) -> StoreResult<Todo> {
        let row = TodoRepo::create(&self.pool, &input, now)
            .await
            .map_err(storage)?;
        Todo::try_from(row).map_err(storage)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Todo>> {
        TodoRepo::find_by_id(&self.pool, id)
            .await
            .map_err(storage)?
            .map(Todo::try_from)
            .transpose()
            .map_err(storage)
    }

    async fn update(&self, id: DbId, patch: &TodoPatch, now: Timestamp) -> StoreResult<bool> {
        TodoRepo::update(&self.pool, id, patch, now)
            .await
            .map_err(storage)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        TodoRepo::delete(&self.pool, id).await.map_err(storage)
    }

    async fn query(&self, query: &TodoQuery) -> StoreResult<QueryResult> {
        let (rows, total) = TodoRepo::page(&self.pool, query).await.map_err(storage)?;
        let items = rows
            .into_iter()
            .map(Todo::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage)?;

        Ok(QueryResult {
            items,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await.map_err(storage)
    }
}
