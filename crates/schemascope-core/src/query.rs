//! Query builder: untrusted request parameters into a bounded,
//! parameterized SELECT.
//!
//! Identifiers (table and column names) are only ever interpolated after
//! validation against the schema snapshot, and are backtick-quoted. Filter
//! values are returned as bindings for the driver's placeholder, never
//! concatenated into the statement.

use crate::error::Error;
use crate::types::Table;

/// Default page when the caller omits one.
pub const DEFAULT_PAGE: i64 = 1;
/// Default page size when the caller omits one.
pub const DEFAULT_LIMIT: i64 = 20;

/// Untrusted, optional request parameters for a table read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Equality filter in `column=value` form, split on the first `=` only
    /// (values may themselves contain `=`).
    pub filter: Option<String>,
    /// Sort spec: `column` or `column:desc`. Any suffix other than
    /// case-insensitive `desc` sorts ascending.
    pub sort: Option<String>,
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size.
    pub limit: Option<i64>,
}

/// A ready-to-execute SELECT: statement text plus bound values in
/// placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub sql: String,
    pub bindings: Vec<String>,
}

/// Build a read-only SELECT against `table_name`.
///
/// The caller resolves `table` from the schema snapshot first, so the table
/// name is already allow-listed; this function validates filter and sort
/// columns against the table's column set.
pub fn build_select(
    table_name: &str,
    table: &Table,
    params: &QueryParams,
) -> Result<SelectQuery, Error> {
    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if page < 1 || limit < 1 {
        return Err(Error::InvalidPagination { page, limit });
    }

    let mut sql = format!("SELECT * FROM {}", quote_ident(table_name));
    let mut bindings = Vec::new();

    if let Some(filter) = params.filter.as_deref() {
        let (column, value) = parse_filter(filter)?;
        if !table.has_column(column) {
            return Err(Error::UnknownColumn(column.to_string()));
        }
        sql.push_str(&format!(" WHERE {} = ?", quote_ident(column)));
        bindings.push(value.to_string());
    }

    if let Some(sort) = params.sort.as_deref() {
        let (column, direction) = parse_sort(sort);
        if !table.has_column(column) {
            return Err(Error::UnknownColumn(column.to_string()));
        }
        sql.push_str(&format!(" ORDER BY {} {}", quote_ident(column), direction));
    }

    // Both operands were validated >= 1; the product can still exceed i64.
    let offset = (page - 1)
        .checked_mul(limit)
        .ok_or(Error::InvalidPagination { page, limit })?;
    sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));

    Ok(SelectQuery { sql, bindings })
}

/// Split a `column=value` filter on the first `=`.
fn parse_filter(filter: &str) -> Result<(&str, &str), Error> {
    match filter.split_once('=') {
        Some((column, value)) if !column.is_empty() => Ok((column, value)),
        _ => Err(Error::InvalidFilterSyntax(filter.to_string())),
    }
}

/// Split a `column[:direction]` sort spec. Only a case-insensitive `desc`
/// suffix sorts descending; anything else falls back to ascending.
fn parse_sort(sort: &str) -> (&str, &'static str) {
    match sort.split_once(':') {
        Some((column, direction)) if direction.eq_ignore_ascii_case("desc") => (column, "DESC"),
        Some((column, _)) => (column, "ASC"),
        None => (sort, "ASC"),
    }
}

/// Backtick-quote an identifier, doubling embedded backticks.
fn quote_ident(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}
