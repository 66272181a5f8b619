//! Shared application state for the server.
//!
//! The state owns the catalog (and through it the connection pool); it is
//! built once at startup and shared across handlers via `Arc`. The schema
//! itself is never cached here: every request recomputes it from the
//! catalog.

use schemascope_core::Error;

use crate::catalog::{Catalog, MySqlCatalog};
use crate::config::DbConfig;

/// Server configuration derived from CLI arguments.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database connection and pool settings.
    pub db: DbConfig,
    /// Port to listen on.
    pub port: u16,
}

/// Shared application state.
pub struct AppState {
    pub config: ServerConfig,
    pub catalog: Box<dyn Catalog>,
}

impl AppState {
    /// Connect the live catalog and build the state.
    pub async fn connect(config: ServerConfig) -> Result<Self, Error> {
        let catalog = MySqlCatalog::connect(&config.db).await?;
        Ok(Self {
            config,
            catalog: Box::new(catalog),
        })
    }

    /// Build state around an existing catalog. Used by tests to substitute
    /// an in-memory implementation.
    pub fn with_catalog(config: ServerConfig, catalog: Box<dyn Catalog>) -> Self {
        Self { config, catalog }
    }
}
