use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    todo_db::health_check(&pool).await.unwrap();

    let columns: Vec<(String,)> = sqlx::query_as(
        "SELECT column_name::text FROM information_schema.columns \
         WHERE table_name = 'todos' ORDER BY column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    let columns: Vec<&str> = columns.iter().map(|c| c.0.as_str()).collect();

    assert_eq!(
        columns,
        [
            "created_at",
            "description",
            "done",
            "due",
            "id",
            "priority",
            "title",
            "updated_at"
        ]
    );
}

/// Column defaults match the documented creation defaults.
#[sqlx::test(migrations = "./migrations")]
async fn test_column_defaults(pool: PgPool) {
    let row: (bool, i32, Option<chrono::DateTime<chrono::Utc>>) = sqlx::query_as(
        "INSERT INTO todos (title, description) VALUES ('a', 'b') \
         RETURNING done, priority, due",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(row, (false, 2, None));
}

/// CHECK constraints back up the application-level rules.
#[sqlx::test(migrations = "./migrations")]
async fn test_check_constraints(pool: PgPool) {
    let statements = [
        "INSERT INTO todos (title, description) VALUES ('', 'b')",
        "INSERT INTO todos (title, description) VALUES ('a', '')",
        "INSERT INTO todos (title, description, priority) VALUES ('a', 'b', 4)",
        "INSERT INTO todos (title, description, created_at, updated_at) \
         VALUES ('a', 'b', now(), now() - interval '1 second')",
    ];

    for sql in statements {
        let result = sqlx::query(sql).execute(&pool).await;
        assert!(result.is_err(), "expected constraint violation for: {sql}");
    }
}
