//! Read-query composition for the todo listing.
//!
//! Turns the optional query-string parameters of a list request into one
//! [`TodoQuery`]: a filter set, a whitelisted sort order, and a page
//! window. Storage backends execute the query; nothing here touches data.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;
use crate::todo::{Priority, Todo};
use crate::validation::rules::from_validator;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Page used when the request omits `page` or sends `0`.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the request omits `limit` or sends `0`.
pub const DEFAULT_LIMIT: u32 = 10;

// ---------------------------------------------------------------------------
// Request parameters
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/v1/todo`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ListTodosParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
    /// Case-insensitive substring matched against title and description.
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub done: Option<bool>,
    #[validate(range(min = 1, max = 3, message = "priority must be between 1 and 3"))]
    pub priority: Option<i32>,
}

/// `?page=` carries an empty value; treat it like an absent one.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

/// How multiple filter parameters combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Only the last present filter in `q -> done -> priority` order applies.
    #[default]
    Exclusive,
    /// All present filters apply together.
    Conjunctive,
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclusive" => Ok(Self::Exclusive),
            "conjunctive" => Ok(Self::Conjunctive),
            other => Err(format!(
                "unknown filter mode '{other}' (expected 'exclusive' or 'conjunctive')"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// A single equality or search predicate over todos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoFilter {
    /// Lowercased needle; matches title OR description.
    Search(String),
    Done(bool),
    Priority(Priority),
}

impl TodoFilter {
    pub fn search(q: &str) -> Self {
        Self::Search(q.to_lowercase())
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            Self::Search(needle) => {
                todo.title.to_lowercase().contains(needle.as_str())
                    || todo.description.to_lowercase().contains(needle.as_str())
            }
            Self::Done(done) => todo.done == *done,
            Self::Priority(priority) => todo.priority == *priority,
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Due,
    Done,
    Priority,
    CreatedAt,
}

impl SortField {
    /// Parse a caller-supplied sort key. Only the whitelisted columns are
    /// selectable; `createdAt` is reserved for the default order.
    pub fn parse_selectable(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "due" => Some(Self::Due),
            "done" => Some(Self::Done),
            "priority" => Some(Self::Priority),
            _ => None,
        }
    }

    /// Storage column name.
    pub fn column(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Due => "due",
            Self::Done => "done",
            Self::Priority => "priority",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Sort column and direction. Ties are always broken by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field.column(), self.order.as_sql())
    }
}

impl SortSpec {
    /// Total order over todos. Missing `due` values sort last in both
    /// directions.
    pub fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        let primary = match self.field {
            SortField::Title => self.order.apply(a.title.cmp(&b.title)),
            SortField::Done => self.order.apply(a.done.cmp(&b.done)),
            SortField::Priority => self.order.apply(a.priority.cmp(&b.priority)),
            SortField::CreatedAt => self.order.apply(a.meta.created_at.cmp(&b.meta.created_at)),
            SortField::Due => match (a.due, b.due) {
                (Some(x), Some(y)) => self.order.apply(x.cmp(&y)),
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
            },
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    }
}

// ---------------------------------------------------------------------------
// Page window
// ---------------------------------------------------------------------------

/// 1-indexed page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Zero and missing values fall back to the defaults.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            limit: limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Rows to skip. A hand-built page `0` reads as the first page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// A fully resolved read query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoQuery {
    /// Predicates that must all hold. Empty means every record matches.
    pub filters: Vec<TodoFilter>,
    pub sort: SortSpec,
    pub page: PageRequest,
}

impl TodoQuery {
    pub fn matches(&self, todo: &Todo) -> bool {
        self.filters.iter().all(|f| f.matches(todo))
    }
}

/// Build the single query a list request resolves to.
pub fn compose(params: &ListTodosParams, mode: FilterMode) -> Result<TodoQuery, CoreError> {
    params
        .validate()
        .map_err(|e| CoreError::InvalidFields(from_validator(&e)))?;

    let mut filters = Vec::with_capacity(3);
    if let Some(q) = params.q.as_deref() {
        filters.push(TodoFilter::search(q));
    }
    if let Some(done) = params.done {
        filters.push(TodoFilter::Done(done));
    }
    if let Some(priority) = params.priority.and_then(Priority::new) {
        filters.push(TodoFilter::Priority(priority));
    }

    if mode == FilterMode::Exclusive && filters.len() > 1 {
        let discarded = filters.len() - 1;
        filters.drain(..discarded);
        tracing::debug!(discarded, "Earlier filters shadowed by the last present filter");
    }

    let sort = match (
        params.sort.as_deref().and_then(SortField::parse_selectable),
        params.order.as_deref().and_then(SortOrder::parse),
    ) {
        (Some(field), Some(order)) => SortSpec { field, order },
        _ => SortSpec::default(),
    };

    let query = TodoQuery {
        filters,
        sort,
        page: PageRequest::new(params.page, params.limit),
    };

    tracing::debug!(
        filters = query.filters.len(),
        sort = %query.sort,
        page = query.page.page,
        limit = query.page.limit,
        "Composed todo query",
    );

    Ok(query)
}
