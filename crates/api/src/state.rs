use std::sync::Arc;

use todo_core::service::{ServiceConfig, TodoService};
use todo_core::store::TodoStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Todo lifecycle service over the configured store.
    pub todos: TodoService,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn TodoStore>) -> Self {
        let todos = TodoService::new(
            store,
            ServiceConfig {
                filter_mode: config.filter_mode,
            },
        );
        Self {
            config: Arc::new(config),
            todos,
        }
    }
}
