//! In-process [`TodoStore`] backed by a vector behind an async lock.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{QueryResult, StoreResult, TodoStore};
use crate::query::TodoQuery;
use crate::todo::{NewTodo, Todo, TodoPatch};
use crate::types::{DbId, Timestamp};

#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: RwLock::new(todos),
        }
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn insert(&self, input: NewTodo, now: Timestamp) -> StoreResult<Todo> {
        let todo = input.into_todo(DbId::new_v4(), now);
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|t| t.id() == id).cloned())
    }

    async fn update(&self, id: DbId, patch: &TodoPatch, now: Timestamp) -> StoreResult<bool> {
        let mut todos = self.todos.write().await;
        match todos.iter_mut().find(|t| t.id() == id) {
            Some(todo) => {
                patch.apply_to(todo, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| t.id() != id);
        Ok(todos.len() < before)
    }

    async fn query(&self, query: &TodoQuery) -> StoreResult<QueryResult> {
        let todos = self.todos.read().await;
        let mut matched: Vec<&Todo> = todos.iter().filter(|t| query.matches(t)).collect();
        matched.sort_by(|a, b| query.sort.compare(a, b));

        let total = matched.len() as u64;
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let items = matched
            .into_iter()
            .skip(offset)
            .take(query.page.limit as usize)
            .cloned()
            .collect();

        Ok(QueryResult { items, total })
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PageRequest, SortField, SortOrder, SortSpec, TodoFilter};
    use crate::todo::Priority;

    fn new_todo(title: &str, priority: i32) -> NewTodo {
        NewTodo {
            title: title.into(),
            description: format!("{title} description"),
            due: None,
            done: false,
            priority: Priority::new(priority).unwrap(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids_and_equal_timestamps() {
        let store = MemoryTodoStore::new();
        let now = crate::types::now();
        let a = store.insert(new_todo("a", 1), now).await.unwrap();
        let b = store.insert(new_todo("b", 1), now).await.unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.meta.created_at, a.meta.updated_at);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = MemoryTodoStore::new();
        let now = crate::types::now();
        let missing = DbId::new_v4();
        assert!(!store.update(missing, &TodoPatch::default(), now).await.unwrap());
        assert!(!store.delete(missing).await.unwrap());

        let todo = store.insert(new_todo("a", 1), now).await.unwrap();
        assert!(store.delete(todo.id()).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn query_filters_sorts_and_windows() {
        let store = MemoryTodoStore::new();
        let now = crate::types::now();
        for (i, title) in ["e", "d", "c", "b", "a"].iter().enumerate() {
            store
                .insert(new_todo(title, if i % 2 == 0 { 1 } else { 3 }), now)
                .await
                .unwrap();
        }

        let query = TodoQuery {
            filters: vec![TodoFilter::Priority(Priority::new(1).unwrap())],
            sort: SortSpec {
                field: SortField::Title,
                order: SortOrder::Asc,
            },
            page: PageRequest { page: 1, limit: 2 },
        };
        let result = store.query(&query).await.unwrap();
        assert_eq!(result.total, 3);
        let titles: Vec<_> = result.items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a", "c"]);

        let page_two = TodoQuery {
            page: PageRequest { page: 2, limit: 2 },
            ..query
        };
        let result = store.query(&page_two).await.unwrap();
        let titles: Vec<_> = result.items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["e"]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let store = MemoryTodoStore::new();
        store
            .insert(new_todo("only", 2), crate::types::now())
            .await
            .unwrap();
        let query = TodoQuery {
            page: PageRequest { page: 9, limit: 10 },
            ..TodoQuery::default()
        };
        let result = store.query(&query).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.total, 1);
    }

    #[tokio::test]
    async fn page_zero_reads_the_first_window() {
        let store = MemoryTodoStore::new();
        let now = crate::types::now();
        for title in ["a", "b", "c"] {
            store.insert(new_todo(title, 2), now).await.unwrap();
        }
        let query = TodoQuery {
            page: PageRequest { page: 0, limit: 2 },
            ..TodoQuery::default()
        };
        let result = store.query(&query).await.unwrap();
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.total, 3);
    }

    #[tokio::test]
    async fn default_order_is_newest_first() {
        let store = MemoryTodoStore::new();
        let t0 = crate::types::now();
        for (i, title) in ["oldest", "middle", "newest"].iter().enumerate() {
            store
                .insert(new_todo(title, 2), t0 + chrono::Duration::seconds(i as i64))
                .await
                .unwrap();
        }

        let result = store.query(&TodoQuery::default()).await.unwrap();
        let titles: Vec<&str> = result.items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["newest", "middle", "oldest"]);
    }
}
