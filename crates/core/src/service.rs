//! Todo lifecycle: get, create, update, delete, and list.
//!
//! The service is the only writer of todo records. Mutation payloads are
//! validated before any storage call; update and delete confirm the record
//! exists first. Existence check and mutation are separate round-trips, so a
//! record deleted concurrently in between is reported (update) or ignored
//! (delete) rather than prevented.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::pagination::{paginate, Page};
use crate::query::{compose, FilterMode, ListTodosParams};
use crate::store::TodoStore;
use crate::todo::Todo;
use crate::types::{self, DbId};
use crate::validation::{validate_create, validate_update};

/// Settings fixed at construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    pub filter_mode: FilterMode,
}

/// Confirmation returned by a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    config: ServiceConfig,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &dyn TodoStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Compose the read query, run it, and wrap the window in a page.
    pub async fn list(
        &self,
        params: &ListTodosParams,
        route: Option<&str>,
    ) -> Result<Page<Todo>, CoreError> {
        let query = compose(params, self.config.filter_mode)?;
        let page = paginate(self.store.as_ref(), &query, route).await?;
        tracing::debug!(
            total = page.meta.total_items,
            count = page.meta.item_count,
            "Listed todos",
        );
        Ok(page)
    }

    pub async fn get(&self, id: DbId) -> Result<Todo, CoreError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::todo_not_found(id))
    }

    pub async fn create(&self, body: &Map<String, Value>) -> Result<Todo, CoreError> {
        let now = types::now();
        let input = validate_create(body, now).map_err(CoreError::InvalidFields)?;

        let todo = self.store.insert(input, now).await?;
        tracing::info!(todo_id = %todo.id(), "Todo created");
        Ok(todo)
    }

    /// Apply a partial update, then re-read so the caller sees stored state.
    pub async fn update(&self, id: DbId, body: &Map<String, Value>) -> Result<Todo, CoreError> {
        let now = types::now();
        let patch = validate_update(body, now).map_err(CoreError::InvalidFields)?;

        self.get(id).await?;

        if !self.store.update(id, &patch, now).await? {
            tracing::warn!(todo_id = %id, "Todo disappeared between existence check and update");
        }

        let todo = self.get(id).await?;
        tracing::info!(todo_id = %id, "Todo updated");
        Ok(todo)
    }

    pub async fn delete(&self, id: DbId) -> Result<Deleted, CoreError> {
        self.get(id).await?;

        if !self.store.delete(id).await? {
            tracing::warn!(todo_id = %id, "Todo disappeared between existence check and delete");
        }

        tracing::info!(todo_id = %id, "Todo deleted");
        Ok(Deleted { deleted: true })
    }
}
