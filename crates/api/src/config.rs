use axum::http::HeaderValue;
use todo_core::query::FilterMode;
use todo_db::DatabaseSettings;

/// Environment name used when `APP_ENV` is unset.
pub const DEFAULT_APP_ENV: &str = "development";

/// Required when `DATABASE_URL` is not set.
const POSTGRES_VARS: [&str; 5] = [
    "POSTGRES_HOST",
    "POSTGRES_PORT",
    "POSTGRES_USER",
    "POSTGRES_PASSWORD",
    "POSTGRES_DATABASE",
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config error - missing env.{}", .0.join(", env."))]
    Missing(Vec<&'static str>),

    #[error("config error - invalid env.{key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Log output format, selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// Everything except the database location has a default suitable for local
/// development. Loading fails as a whole so that every missing variable is
/// reported at once.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `9000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database: DatabaseSettings,
    /// Pool size (default: `20`).
    pub db_max_connections: u32,
    /// How list filters combine (default: exclusive).
    pub filter_mode: FilterMode,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `9000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    /// | `TODO_FILTER_MODE`     | `exclusive`                |
    /// | `LOG_FORMAT`           | `pretty`                   |
    /// | `DATABASE_URL`         | built from `POSTGRES_*`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&var, "PORT", 9000u16)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                key: "CORS_ORIGINS",
                reason: format!("'{origin}': {e}"),
            })?;
        }

        let request_timeout_secs = parse_or(&var, "REQUEST_TIMEOUT_SECS", 30u64)?;
        let db_max_connections = parse_or(&var, "DB_MAX_CONNECTIONS", 20u32)?;

        let filter_mode = match var("TODO_FILTER_MODE") {
            Some(raw) => raw.parse::<FilterMode>().map_err(|reason| ConfigError::Invalid {
                key: "TODO_FILTER_MODE",
                reason,
            })?,
            None => FilterMode::default(),
        };

        let log_format = match var("LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let database = database_settings(&var)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database,
            db_max_connections,
            filter_mode,
            log_format,
        })
    }
}

/// Load `.env.{APP_ENV}` then `.env`. Variables already present in the
/// process environment are never overwritten. Returns the environment name.
pub fn load_dotenv() -> String {
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_APP_ENV.into());
    dotenvy::from_filename(format!(".env.{app_env}")).ok();
    dotenvy::dotenv().ok();
    app_env
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn database_settings<F>(var: &F) -> Result<DatabaseSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = var("DATABASE_URL") {
        return Ok(DatabaseSettings::Url(url));
    }

    let missing: Vec<&'static str> = POSTGRES_VARS
        .into_iter()
        .filter(|&key| var(key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::Missing(missing));
    }

    let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(vec![key]));
    Ok(DatabaseSettings::Params {
        host: required("POSTGRES_HOST")?,
        port: parse_or(var, "POSTGRES_PORT", 5432u16)?,
        username: required("POSTGRES_USER")?,
        password: required("POSTGRES_PASSWORD")?,
        database: required("POSTGRES_DATABASE")?,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_with_only_database_url() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/todos")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.db_max_connections, 20);
        assert_eq!(config.filter_mode, FilterMode::Exclusive);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(
            config.database,
            DatabaseSettings::Url("postgres://localhost/todos".into())
        );
    }

    #[test]
    fn postgres_parts_replace_database_url() {
        let config = load(&[
            ("POSTGRES_HOST", "db"),
            ("POSTGRES_PORT", "5433"),
            ("POSTGRES_USER", "todo"),
            ("POSTGRES_PASSWORD", "secret"),
            ("POSTGRES_DATABASE", "todos"),
        ])
        .unwrap();
        assert_eq!(
            config.database,
            DatabaseSettings::Params {
                host: "db".into(),
                port: 5433,
                username: "todo".into(),
                password: "secret".into(),
                database: "todos".into(),
            }
        );
    }

    #[test]
    fn all_missing_database_vars_are_reported_together() {
        let err = load(&[("POSTGRES_HOST", "db"), ("POSTGRES_USER", "todo")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec![
                "POSTGRES_PORT",
                "POSTGRES_PASSWORD",
                "POSTGRES_DATABASE"
            ])
        );
        assert_eq!(
            err.to_string(),
            "config error - missing env.POSTGRES_PORT, env.POSTGRES_PASSWORD, env.POSTGRES_DATABASE"
        );
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = load(&[("DATABASE_URL", "  ")]).unwrap_err();
        assert_matches!(err, ConfigError::Missing(keys) if keys.len() == 5);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/todos"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("TODO_FILTER_MODE", "Conjunctive"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.db_max_connections, 4);
        assert_eq!(config.filter_mode, FilterMode::Conjunctive);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/todos"),
            ("PORT", "ninety"),
        ])
        .unwrap_err();
        assert_matches!(err, ConfigError::Invalid { key: "PORT", .. });
    }

    #[test]
    fn unknown_filter_mode_is_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/todos"),
            ("TODO_FILTER_MODE", "any"),
        ])
        .unwrap_err();
        assert_matches!(err, ConfigError::Invalid { key: "TODO_FILTER_MODE", .. });
    }

    #[test]
    fn invalid_cors_origin_is_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/todos"),
            ("CORS_ORIGINS", "http://ok.test,bad\norigin"),
        ])
        .unwrap_err();
        assert_matches!(err, ConfigError::Invalid { key: "CORS_ORIGINS", .. });
    }
}
