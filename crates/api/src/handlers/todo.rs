//! Handlers for the todo resource.
//!
//! Thin adapters: extract, call [`TodoService`](todo_core::service::TodoService),
//! serialize. Validation and existence checks live in the service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use todo_core::pagination::Page;
use todo_core::query::ListTodosParams;
use todo_core::service::Deleted;
use todo_core::todo::Todo;

use crate::error::AppResult;
use crate::extract::{ApiQuery, JsonObject, TodoId};
use crate::state::AppState;

/// Public path of the collection; pagination links point here.
pub const TODO_ROUTE: &str = "/api/v1/todo";

/// GET /api/v1/todo
///
/// One page of todos, filtered and sorted per the query string.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListTodosParams>,
) -> AppResult<Json<Page<Todo>>> {
    let page = state.todos.list(&params, Some(TODO_ROUTE)).await?;
    Ok(Json(page))
}

/// GET /api/v1/todo/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> AppResult<Json<Todo>> {
    let todo = state.todos.get(id).await?;
    Ok(Json(todo))
}

/// POST /api/v1/todo
pub async fn create(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> AppResult<(StatusCode, Json<Todo>)> {
    let todo = state.todos.create(&body).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /api/v1/todo/{id}
///
/// Partial update; absent fields keep their stored values.
pub async fn update(
    State(state): State<AppState>,
    TodoId(id): TodoId,
    JsonObject(body): JsonObject,
) -> AppResult<Json<Todo>> {
    let todo = state.todos.update(id, &body).await?;
    Ok(Json(todo))
}

/// DELETE /api/v1/todo/{id}
pub async fn delete(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> AppResult<Json<Deleted>> {
    let deleted = state.todos.delete(id).await?;
    Ok(Json(deleted))
}
