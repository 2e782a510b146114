//! Page envelope for list responses.
//!
//! Wraps one window of a query result with count metadata and navigation
//! links. Filtering and ordering are already fixed by the query; this layer
//! only describes the window.

use serde::{Deserialize, Serialize};

use crate::query::{PageRequest, TodoQuery};
use crate::store::{StoreResult, TodoStore};
use crate::todo::Todo;

/// Count metadata for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_items: u64,
    pub item_count: u64,
    pub items_per_page: u32,
    pub total_pages: u64,
    pub current_page: u32,
}

/// Navigation references. Links to pages that do not exist are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub first: Option<String>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
    pub links: PageLinks,
}

impl<T> Page<T> {
    /// Assemble a page from one window of items and the total match count.
    ///
    /// `route` is the list endpoint the links point back to; without one
    /// every link is `None`.
    pub fn new(items: Vec<T>, total_items: u64, request: PageRequest, route: Option<&str>) -> Self {
        let limit = u64::from(request.limit.max(1));
        let total_pages = total_items.div_ceil(limit);
        let current = u64::from(request.page);
        // Past the end, `previous` points back at the last real page.
        let previous = current.saturating_sub(1).min(total_pages);

        let links = match route {
            Some(route) => {
                let link = |page: u64| format!("{route}?page={page}&limit={limit}");
                PageLinks {
                    first: Some(format!("{route}?limit={limit}")),
                    previous: (previous >= 1).then(|| link(previous)),
                    next: (current < total_pages).then(|| link(current + 1)),
                    last: (total_pages > 0).then(|| link(total_pages)),
                }
            }
            None => PageLinks::default(),
        };

        Self {
            meta: PageMeta {
                total_items,
                item_count: items.len() as u64,
                items_per_page: request.limit,
                total_pages,
                current_page: request.page,
            },
            items,
            links,
        }
    }
}

/// Execute `query` through `store` with its offset/limit window and wrap the
/// result.
pub async fn paginate(
    store: &dyn TodoStore,
    query: &TodoQuery,
    route: Option<&str>,
) -> StoreResult<Page<Todo>> {
    let result = store.query(query).await?;
    Ok(Page::new(result.items, result.total, query.page, route))
}
