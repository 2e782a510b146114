//! The todo record and the write-side shapes that produce it.
//!
//! Shared bookkeeping columns (`id`, `created_at`, `updated_at`) live in
//! [`RecordMeta`], which every persisted record embeds.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Column limits
// ---------------------------------------------------------------------------

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

pub const PRIORITY_MIN: i32 = 1;
pub const PRIORITY_MAX: i32 = 3;
pub const DEFAULT_PRIORITY: i32 = 2;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Todo priority, always within `PRIORITY_MIN..=PRIORITY_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Priority(i32);

impl Priority {
    /// Returns `None` when `value` is out of range.
    pub fn new(value: i32) -> Option<Self> {
        (PRIORITY_MIN..=PRIORITY_MAX)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(DEFAULT_PRIORITY)
    }
}

impl TryFrom<i32> for Priority {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!("priority must be between {PRIORITY_MIN} and {PRIORITY_MAX}, got {value}")
        })
    }
}

impl From<Priority> for i32 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

// ---------------------------------------------------------------------------
// Persisted record
// ---------------------------------------------------------------------------

/// Identity and audit timestamps shared by every persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    pub id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A todo as stored and as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub title: String,
    pub description: String,
    pub due: Option<Timestamp>,
    pub done: bool,
    pub priority: Priority,
}

impl Todo {
    pub fn id(&self) -> DbId {
        self.meta.id
    }
}

// ---------------------------------------------------------------------------
// Write-side shapes
// ---------------------------------------------------------------------------

/// A validated creation payload with defaults already filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub due: Option<Timestamp>,
    pub done: bool,
    pub priority: Priority,
}

impl NewTodo {
    /// Materialize the record once storage has assigned an id.
    pub fn into_todo(self, id: DbId, now: Timestamp) -> Todo {
        Todo {
            meta: RecordMeta {
                id,
                created_at: now,
                updated_at: now,
            },
            title: self.title,
            description: self.description,
            due: self.due,
            done: self.done,
            priority: self.priority,
        }
    }
}

/// A validated partial update. `None` leaves the stored value untouched.
///
/// `due` is doubly optional: `Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<Option<Timestamp>>,
    pub done: Option<bool>,
    pub priority: Option<Priority>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due.is_none()
            && self.done.is_none()
            && self.priority.is_none()
    }

    /// Apply the supplied fields onto `todo` and refresh `updated_at`.
    ///
    /// `updated_at` never moves before `created_at`.
    pub fn apply_to(&self, todo: &mut Todo, now: Timestamp) {
        if let Some(title) = &self.title {
            todo.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            todo.description.clone_from(description);
        }
        if let Some(due) = self.due {
            todo.due = due;
        }
        if let Some(done) = self.done {
            todo.done = done;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        todo.meta.updated_at = now.max(todo.meta.created_at);
    }
}
