//! Row model for the `todos` table.

use sqlx::FromRow;
use todo_core::todo::{Priority, RecordMeta, Todo};
use todo_core::types::{DbId, Timestamp};

/// A row from the `todos` table.
#[derive(Debug, Clone, FromRow)]
pub struct TodoRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub due: Option<Timestamp>,
    pub done: bool,
    pub priority: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<TodoRow> for Todo {
    type Error = sqlx::Error;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let priority = Priority::try_from(row.priority).map_err(|e| sqlx::Error::ColumnDecode {
            index: "priority".into(),
            source: e.into(),
        })?;

        Ok(Todo {
            meta: RecordMeta {
                id: row.id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            title: row.title,
            description: row.description,
            due: row.due,
            done: row.done,
            priority,
        })
    }
}
