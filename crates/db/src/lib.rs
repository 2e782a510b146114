//! PostgreSQL persistence for todos.

pub mod models;
pub mod repositories;
pub mod store;

use std::fmt;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub use store::PgTodoStore;

pub type DbPool = sqlx::PgPool;

/// Where to connect: a full URL, or discrete connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseSettings {
    Url(String),
    Params {
        host: String,
        port: u16,
        username: String,
        password: String,
        database: String,
    },
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match self {
            Self::Url(url) => url.parse(),
            Self::Params {
                host,
                port,
                username,
                password,
                database,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(username)
                .password(password)
                .database(database)),
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(_) => f.write_str("Url(<redacted>)"),
            Self::Params {
                host,
                port,
                username,
                database,
                ..
            } => f
                .debug_struct("Params")
                .field("host", host)
                .field("port", port)
                .field("username", username)
                .field("database", database)
                .finish_non_exhaustive(),
        }
    }
}

/// Create a connection pool.
pub async fn create_pool(
    settings: &DatabaseSettings,
    max_connections: u32,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(settings.connect_options()?)
        .await
}

/// Round-trip a trivial statement to prove the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_credentials() {
        let url = DatabaseSettings::Url("postgres://u:secret@h/db".into());
        assert!(!format!("{url:?}").contains("secret"));

        let params = DatabaseSettings::Params {
            host: "h".into(),
            port: 5432,
            username: "u".into(),
            password: "secret".into(),
            database: "db".into(),
        };
        let rendered = format!("{params:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("5432"));
    }

    #[test]
    fn params_build_connect_options() {
        let params = DatabaseSettings::Params {
            host: "db.internal".into(),
            port: 6543,
            username: "todo".into(),
            password: "p@ss/word".into(),
            database: "todos".into(),
        };
        let options = params.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("todos"));
    }

    #[test]
    fn malformed_url_is_rejected() {
        assert!(DatabaseSettings::Url("not a url".into())
            .connect_options()
            .is_err());
    }
}
