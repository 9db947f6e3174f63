use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://hkpass.db?mode=rwc";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8000;
const DEFAULT_LOG_FILE_PATH: &str = "logs/hkpass.log";
const DEFAULT_LOG_ARCHIVE_PATTERN: &str = "logs/hkpass.{}.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub http_port: u16,
    pub log_file_path: String,
    pub log_archive_pattern: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            database_url: text("HKPASS_DATABASE_URL", DEFAULT_DATABASE_URL),
            db_max_connections: number(
                &lookup,
                "HKPASS_DB_MAX_CONNECTIONS",
                DEFAULT_DB_MAX_CONNECTIONS,
            )?,
            host: text("HKPASS_HOST", DEFAULT_HOST),
            http_port: number(&lookup, "HKPASS_HTTP_PORT", DEFAULT_HTTP_PORT)?,
            log_file_path: text("LOG_FILE_PATH", DEFAULT_LOG_FILE_PATH),
            log_archive_pattern: text("LOG_ARCHIVE_PATTERN", DEFAULT_LOG_ARCHIVE_PATTERN),
        })
    }
}

fn number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}
