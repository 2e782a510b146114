//! Repository for the `todos` table.

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use todo_core::query::{SortField, SortSpec, TodoFilter, TodoQuery};
use todo_core::todo::{NewTodo, Priority, TodoPatch};
use todo_core::types::{DbId, Timestamp};

use crate::models::todo::TodoRow;

const COLUMNS: &str = "id, title, description, due, done, priority, created_at, updated_at";

/// Provides CRUD and listing operations for todos.
pub struct TodoRepo;

impl TodoRepo {
    /// Insert a new todo, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewTodo,
        now: Timestamp,
    ) -> Result<TodoRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos \
                (title, description, due, done, priority, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TodoRow>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.due)
            .bind(input.done)
            .bind(input.priority.get())
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a todo by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TodoRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        sqlx::query_as::<_, TodoRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a todo. Only non-`None` fields are applied; `due` is cleared
    /// when the patch carries `Some(None)`. Returns `true` if a row changed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &TodoPatch,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE todos SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                due = CASE WHEN $4 THEN $5 ELSE due END, \
                done = COALESCE($6, done), \
                priority = COALESCE($7, priority), \
                updated_at = GREATEST($8, created_at) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.due.is_some())
        .bind(patch.due.flatten())
        .bind(patch.done)
        .bind(patch.priority.map(Priority::get))
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a todo by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch one sorted window and the total match count from a single
    /// snapshot, so `total` always describes the rows returned.
    pub async fn page(
        pool: &PgPool,
        query: &TodoQuery,
    ) -> Result<(Vec<TodoRow>, i64), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total = Self::count(&mut *tx, query).await?;
        let rows = Self::list(&mut *tx, query).await?;

        tx.commit().await?;
        Ok((rows, total))
    }

    /// Count every row matching the query's filters.
    pub async fn count(conn: &mut PgConnection, query: &TodoQuery) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM todos");
        push_filters(&mut builder, &query.filters);
        builder.build_query_scalar::<i64>().fetch_one(conn).await
    }

    /// Fetch one sorted window of rows matching the query's filters.
    pub async fn list(
        conn: &mut PgConnection,
        query: &TodoQuery,
    ) -> Result<Vec<TodoRow>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM todos"));
        push_filters(&mut builder, &query.filters);
        builder.push(" ORDER BY ");
        builder.push(order_clause(&query.sort));
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(query.page.limit));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));
        builder.build_query_as::<TodoRow>().fetch_all(conn).await
    }
}

/// Append a `WHERE` clause joining every filter with `AND`.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &[TodoFilter]) {
    for (i, filter) in filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        match filter {
            TodoFilter::Search(needle) => {
                builder.push("(strpos(LOWER(title), ");
                builder.push_bind(needle.clone());
                builder.push(") > 0 OR strpos(LOWER(description), ");
                builder.push_bind(needle.clone());
                builder.push(") > 0)");
            }
            TodoFilter::Done(done) => {
                builder.push("done = ");
                builder.push_bind(*done);
            }
            TodoFilter::Priority(priority) => {
                builder.push("priority = ");
                builder.push_bind(priority.get());
            }
        }
    }
}

/// `ORDER BY` body for a sort order. Column names come from the whitelist,
/// never from caller input.
fn order_clause(sort: &SortSpec) -> String {
    let dir = sort.order.as_sql();
    let primary = match sort.field {
        SortField::Title => format!("title COLLATE \"C\" {dir}"),
        SortField::Due => format!("due {dir} NULLS LAST"),
        field => format!("{} {dir}", field.column()),
    };
    format!("{primary}, id ASC")
}
