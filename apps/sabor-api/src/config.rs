//! API configuration module.
//!
//! Configuration is loaded once at startup from environment variables with
//! fallback to defaults. `AUTH_SECRET` has no default.

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// HTTP API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size for the SQLite database
    pub db_max_connections: u32,

    /// HMAC secret for session tokens
    #[serde(skip_serializing)]
    pub auth_secret: String,

    /// Session lifetime in seconds (token expiry and cookie max-age)
    pub session_max_age_secs: i64,

    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = resolve_database_path(lookup("SABOR_DB_PATH"))?;

        let auth_secret = lookup("AUTH_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingRequired("AUTH_SECRET".to_string()))?;

        let config = ApiConfig {
            http_port: lookup("HTTP_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path,

            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            auth_secret,

            session_max_age_secs: lookup("SESSION_MAX_AGE_SECS")
                .unwrap_or_else(|| "28800".to_string()) // 8 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SESSION_MAX_AGE_SECS".to_string()))?,

            cookie_secure: lookup("COOKIE_SECURE")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("COOKIE_SECURE".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        if config.session_max_age_secs <= 0 {
            return Err(ConfigError::InvalidValue("SESSION_MAX_AGE_SECS".to_string()));
        }

        Ok(config)
    }
}

/// `SABOR_DB_PATH` when set, else the platform default.
pub fn resolve_database_path(configured: Option<String>) -> Result<PathBuf, ConfigError> {
    match configured.filter(|p| !p.trim().is_empty()) {
        Some(path) => Ok(PathBuf::from(path)),
        None => default_database_path(),
    }
}

/// `<platform data dir>/sabor.db`, creating the directory if needed.
///
/// - Linux: `~/.local/share/pos/`
/// - macOS: `~/Library/Application Support/com.sabor.pos/`
/// - Windows: `%APPDATA%\sabor\pos\data\`
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "sabor", "pos")
        .ok_or_else(|| ConfigError::MissingRequired("SABOR_DB_PATH".to_string()))?;

    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(ConfigError::DataDir)?;

    Ok(data_dir.join("sabor.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to create data directory: {0}")]
    DataDir(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("AUTH_SECRET", "s3cret"),
            ("SABOR_DB_PATH", "/tmp/sabor-test.db"),
        ]))
        .unwrap();

        assert_eq!(config.http_port, 3000);
        assert_eq!(config.database_path, PathBuf::from("/tmp/sabor-test.db"));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.session_max_age_secs, 28800);
        assert!(!config.cookie_secure);
    }

    #[test]
    fn test_missing_secret() {
        let err = ApiConfig::from_lookup(lookup(&[("SABOR_DB_PATH", "/tmp/x.db")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(ref v) if v == "AUTH_SECRET"));

        let empty = ApiConfig::from_lookup(lookup(&[
            ("SABOR_DB_PATH", "/tmp/x.db"),
            ("AUTH_SECRET", ""),
        ]))
        .unwrap_err();
        assert!(matches!(empty, ConfigError::MissingRequired(_)));
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = ApiConfig::from_lookup(lookup(&[
            ("SABOR_DB_PATH", "/tmp/x.db"),
            ("AUTH_SECRET", "s"),
            ("HTTP_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for HTTP_PORT");

        let err = ApiConfig::from_lookup(lookup(&[
            ("SABOR_DB_PATH", "/tmp/x.db"),
            ("AUTH_SECRET", "s"),
            ("COOKIE_SECURE", "yes"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for COOKIE_SECURE");

        let err = ApiConfig::from_lookup(lookup(&[
            ("SABOR_DB_PATH", "/tmp/x.db"),
            ("AUTH_SECRET", "s"),
            ("SESSION_MAX_AGE_SECS", "0"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for SESSION_MAX_AGE_SECS");
    }
}
