//! MySQL catalog reader over `information_schema`.
//!
//! All introspection statements are scoped to the connection's current
//! database and bind the table name; identifiers are never interpolated
//! into catalog queries. Each call borrows one pooled connection and the
//! pool guard releases it on every exit path.

use std::time::Duration;

use rust_decimal::Decimal;
use schemascope_core::{
    build_schema, Error, RawColumn, RawForeignKey, RawIndex, RawTable, Schema, SelectQuery,
};
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::pool::PoolConnection;
use sqlx::{Column, Row};
use tracing::debug;

use crate::config::DbConfig;

use super::{Catalog, Record};

const TABLES_SQL: &str = "\
    SELECT TABLE_NAME AS table_name \
    FROM information_schema.TABLES \
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
    ORDER BY TABLE_NAME";

const COLUMNS_SQL: &str = "\
    SELECT COLUMN_NAME AS column_name, COLUMN_TYPE AS column_type, \
           IS_NULLABLE AS is_nullable, COLUMN_KEY AS column_key, EXTRA AS extra \
    FROM information_schema.COLUMNS \
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
    ORDER BY ORDINAL_POSITION";

const FOREIGN_KEYS_SQL: &str = "\
    SELECT COLUMN_NAME AS column_name, \
           REFERENCED_TABLE_NAME AS referenced_table_name, \
           REFERENCED_COLUMN_NAME AS referenced_column_name \
    FROM information_schema.KEY_COLUMN_USAGE \
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
      AND REFERENCED_TABLE_NAME IS NOT NULL \
    ORDER BY ORDINAL_POSITION";

// The synthetic PRIMARY entry is excluded here; the primary key is modeled
// on the table itself, not as an index.
const INDEXES_SQL: &str = "\
    SELECT INDEX_NAME AS index_name, COLUMN_NAME AS column_name, \
           INDEX_TYPE AS index_type, NON_UNIQUE AS non_unique \
    FROM information_schema.STATISTICS \
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
      AND INDEX_NAME <> 'PRIMARY' \
    ORDER BY INDEX_NAME, SEQ_IN_INDEX";

/// Catalog implementation backed by a bounded sqlx MySQL pool.
pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    /// Connect a bounded pool using the resolved configuration.
    pub async fn connect(config: &DbConfig) -> Result<Self, Error> {
        let url = config
            .connection_url()
            .map_err(|e| Error::CatalogUnavailable(e.to_string()))?;
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&url)
            .await
            .map_err(|e| Error::CatalogUnavailable(e.to_string()))?;
        Ok(Self { pool })
    }

    async fn acquire(&self) -> Result<PoolConnection<MySql>, Error> {
        self.pool.acquire().await.map_err(|e| match e {
            sqlx::Error::PoolTimedOut => Error::PoolExhausted,
            other => Error::CatalogUnavailable(other.to_string()),
        })
    }
}

#[async_trait::async_trait]
impl Catalog for MySqlCatalog {
    async fn crawl_schema(&self) -> Result<Schema, Error> {
        let mut conn = self.acquire().await?;

        let names: Vec<String> = sqlx::query_scalar(TABLES_SQL)
            .fetch_all(&mut *conn)
            .await
            .map_err(catalog_error)?;

        let mut raw_tables = Vec::with_capacity(names.len());
        for name in names {
            debug!(table = %name, "introspecting table");

            let columns = sqlx::query(COLUMNS_SQL)
                .bind(&name)
                .fetch_all(&mut *conn)
                .await
                .map_err(catalog_error)?
                .iter()
                .map(|row| RawColumn {
                    name: row.get("column_name"),
                    data_type: row.get("column_type"),
                    nullable: row.get::<String, _>("is_nullable") == "YES",
                    column_key: row.get("column_key"),
                    extra: row.get("extra"),
                })
                .collect();

            let foreign_keys = sqlx::query(FOREIGN_KEYS_SQL)
                .bind(&name)
                .fetch_all(&mut *conn)
                .await
                .map_err(catalog_error)?
                .iter()
                .map(|row| RawForeignKey {
                    column_name: row.get("column_name"),
                    referenced_table_name: row.get("referenced_table_name"),
                    referenced_column_name: row.get("referenced_column_name"),
                })
                .collect();

            let indexes = sqlx::query(INDEXES_SQL)
                .bind(&name)
                .fetch_all(&mut *conn)
                .await
                .map_err(catalog_error)?
                .iter()
                .map(|row| RawIndex {
                    name: row.get("index_name"),
                    columns: row.get("column_name"),
                    index_type: row.get("index_type"),
                    non_unique: flag_from_row(row, "non_unique"),
                })
                .collect();

            raw_tables.push(RawTable {
                name,
                columns,
                foreign_keys,
                indexes,
            });
        }

        Ok(build_schema(raw_tables))
    }

    async fn fetch_rows(&self, query: &SelectQuery) -> Result<Vec<Record>, Error> {
        let mut conn = self.acquire().await?;

        debug!(sql = %query.sql, "fetching rows");
        let mut prepared = sqlx::query(&query.sql);
        for value in &query.bindings {
            prepared = prepared.bind(value);
        }
        let rows = prepared
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| Error::QueryExecutionFailed(e.to_string()))?;

        Ok(rows.iter().map(row_to_record).collect())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn catalog_error(err: sqlx::Error) -> Error {
    Error::CatalogUnavailable(err.to_string())
}

/// Decode a numeric flag column that MySQL may report as different integer
/// widths depending on version.
fn flag_from_row(row: &MySqlRow, name: &str) -> bool {
    if let Ok(v) = row.try_get::<i64, _>(name) {
        return v != 0;
    }
    if let Ok(v) = row.try_get::<i32, _>(name) {
        return v != 0;
    }
    row.try_get::<bool, _>(name).unwrap_or(false)
}

fn row_to_record(row: &MySqlRow) -> Record {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| (column.name().to_string(), decode_value(row, idx)))
        .collect()
}

/// Decode one cell into JSON, trying progressively looser types. Temporal
/// and decimal values render as strings; anything undecodable is null.
fn decode_value(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Decimal>, _>(idx) {
        return v.map(|d| Value::String(d.to_string())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return v.map(|t| Value::String(t.to_rfc3339())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return v.map(|t| Value::String(t.to_string())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return v.map(|t| Value::String(t.to_string())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveTime>, _>(idx) {
        return v.map(|t| Value::String(t.to_string())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return v
            .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            .unwrap_or(Value::Null);
    }
    Value::Null
}
