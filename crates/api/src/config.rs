use std::path::PathBuf;

use yarnstash_core::search::MatchCase;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    fn from_env_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// SQLite connection URL.
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory uploaded images are written to and served from.
    pub upload_dir: PathBuf,
    /// Scheme and host prefixed to `/uploads/{name}` in image URLs.
    pub public_base_url: String,
    /// Maximum request body size in bytes, uploads included.
    pub max_upload_bytes: usize,
    /// Whether project search distinguishes letter case.
    pub search_case_sensitive: bool,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                          |
    /// |-------------------------|----------------------------------|
    /// | `HOST`                  | `0.0.0.0`                        |
    /// | `PORT`                  | `3000`                           |
    /// | `DATABASE_URL`          | `sqlite://yarnstash.db?mode=rwc` |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                             |
    /// | `UPLOAD_DIR`            | `public/uploads`                 |
    /// | `PUBLIC_BASE_URL`       | `http://localhost:3000`          |
    /// | `MAX_UPLOAD_BYTES`      | `10485760`                       |
    /// | `SEARCH_CASE_SENSITIVE` | `false`                          |
    /// | `LOG_FORMAT`            | `text`                           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://yarnstash.db?mode=rwc".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir = PathBuf::from(
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "public/uploads".into()),
        );

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "10485760".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let search_case_sensitive: bool = std::env::var("SEARCH_CASE_SENSITIVE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SEARCH_CASE_SENSITIVE must be 'true' or 'false'");

        let log_format = std::env::var("LOG_FORMAT")
            .map(|v| LogFormat::from_env_value(&v))
            .unwrap_or_default();

        Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            public_base_url,
            max_upload_bytes,
            search_case_sensitive,
            log_format,
        }
    }

    /// Keyword matching mode for project search.
    pub fn search_match_case(&self) -> MatchCase {
        MatchCase::from_flag(self.search_case_sensitive)
    }
}
