//! Database connection configuration.
//!
//! Connection parameters are resolved once at process start, in order of
//! precedence: `--database-url`, the `DATABASE_URL` environment variable,
//! then a JSON config file holding either a full `url` or discrete
//! host/user/password/database fields.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

const DEFAULT_PORT: u16 = 3306;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Connection parameters plus pool sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// Full connection URL; takes precedence over the discrete fields.
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long to wait for a pooled connection before reporting
    /// exhaustion.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_acquire_timeout_secs() -> u64 {
    DEFAULT_ACQUIRE_TIMEOUT_SECS
}

impl DbConfig {
    /// Build a config straight from a connection URL with default pool
    /// settings.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            host: None,
            port: None,
            user: None,
            password: None,
            database: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }

    /// Parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Resolve connection settings: explicit URL, then environment, then
    /// config file.
    pub fn resolve(database_url: Option<&str>, config_path: &Path) -> Result<Self> {
        if let Some(url) = database_url {
            return Ok(Self::from_url(url));
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            return Ok(Self::from_url(url));
        }
        if config_path.exists() {
            return Self::load(config_path);
        }
        bail!(
            "no database connection configured (use --database-url, DATABASE_URL, or {})",
            config_path.display()
        );
    }

    /// The connection URL, assembled from discrete fields when no full URL
    /// was given.
    pub fn connection_url(&self) -> Result<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        let host = self.host.as_deref().unwrap_or("localhost");
        let port = self.port.unwrap_or(DEFAULT_PORT);
        let user = self
            .user
            .as_deref()
            .context("config is missing 'user' (or a full 'url')")?;
        let database = self
            .database
            .as_deref()
            .context("config is missing 'database' (or a full 'url')")?;
        let url = match self.password.as_deref() {
            Some(password) => format!("mysql://{user}:{password}@{host}:{port}/{database}"),
            None => format!("mysql://{user}@{host}:{port}/{database}"),
        };
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_url_passes_through() {
        let config = DbConfig::from_url("mysql://u:p@db:3306/shop");
        assert_eq!(config.connection_url().unwrap(), "mysql://u:p@db:3306/shop");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn discrete_fields_assemble_a_url() {
        let config: DbConfig = serde_json::from_str(
            r#"{"host": "db", "user": "app", "password": "secret", "database": "shop"}"#,
        )
        .unwrap();
        assert_eq!(
            config.connection_url().unwrap(),
            "mysql://app:secret@db:3306/shop"
        );
    }

    #[test]
    fn passwordless_url_omits_the_colon() {
        let config: DbConfig =
            serde_json::from_str(r#"{"user": "app", "database": "shop"}"#).unwrap();
        assert_eq!(
            config.connection_url().unwrap(),
            "mysql://app@localhost:3306/shop"
        );
    }

    #[test]
    fn missing_user_is_an_error() {
        let config: DbConfig = serde_json::from_str(r#"{"database": "shop"}"#).unwrap();
        assert!(config.connection_url().is_err());
    }

    #[test]
    fn pool_settings_come_from_the_file() {
        let config: DbConfig = serde_json::from_str(
            r#"{"url": "mysql://u@db/shop", "max_connections": 12, "acquire_timeout_secs": 2}"#,
        )
        .unwrap();
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.acquire_timeout_secs, 2);
    }

    #[test]
    fn load_reads_a_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"url": "mysql://u@db/shop"}"#).unwrap();
        let config = DbConfig::load(&path).unwrap();
        assert_eq!(config.url.as_deref(), Some("mysql://u@db/shop"));
    }
}
