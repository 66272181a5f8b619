//! Live database catalog access.
//!
//! The [`Catalog`] trait is the seam between the pure core and the
//! database: implementations query the engine's system catalog for schema
//! metadata and execute the core's prepared SELECTs. The serve-mode tests
//! substitute an in-memory implementation.

mod mysql;

pub use mysql::MySqlCatalog;

use schemascope_core::{Error, Schema, SelectQuery};

/// One fetched row, column name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A source of schema metadata and table records.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Read the full schema from the system catalog.
    ///
    /// All-or-nothing: any introspection failure aborts the crawl with
    /// [`Error::CatalogUnavailable`] and no partial schema is returned.
    async fn crawl_schema(&self) -> Result<Schema, Error>;

    /// Execute a built SELECT and return its rows as JSON records.
    async fn fetch_rows(&self, query: &SelectQuery) -> Result<Vec<Record>, Error>;

    /// Release the underlying connections. Called once at shutdown.
    async fn close(&self) {}
}
