//! Error taxonomy shared by the core and the catalog/service layers.
//!
//! Every failure in the system is classified into one of these variants and
//! returned to the caller; nothing is swallowed or retried internally. The
//! service layer translates them into HTTP responses (see the CLI crate).

use thiserror::Error;

/// Errors produced while reading the catalog, building queries, or fetching
/// records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The database connection could not be established or an introspection
    /// statement failed. Fatal to the whole schema read; no partial schema
    /// is returned.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// A caller-supplied table name is not present in the schema.
    #[error("unknown table '{0}'")]
    UnknownTable(String),

    /// A caller-supplied filter or sort column is not present in the table.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// The filter parameter is not a `column=value` pair.
    #[error("invalid filter syntax: {0}")]
    InvalidFilterSyntax(String),

    /// Page or limit below 1.
    #[error("invalid pagination: page and limit must be >= 1 (got page={page}, limit={limit})")]
    InvalidPagination { page: i64, limit: i64 },

    /// No pooled connection became available within the acquire timeout.
    /// Retryable by the caller with backoff.
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// A record fetch failed after the schema was already read. Distinct
    /// from introspection failure; the connection is still released.
    #[error("query execution failed: {0}")]
    QueryExecutionFailed(String),
}

impl Error {
    /// Whether the error was caused by the caller's request parameters
    /// rather than the database or the service itself.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownTable(_)
                | Error::UnknownColumn(_)
                | Error::InvalidFilterSyntax(_)
                | Error::InvalidPagination { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_identifier() {
        let err = Error::UnknownColumn("created_at".to_string());
        assert_eq!(err.to_string(), "unknown column 'created_at'");
    }

    #[test]
    fn caller_errors_are_classified() {
        assert!(Error::UnknownTable("users".into()).is_caller_error());
        assert!(Error::InvalidPagination { page: 0, limit: 20 }.is_caller_error());
        assert!(!Error::PoolExhausted.is_caller_error());
        assert!(!Error::CatalogUnavailable("connection refused".into()).is_caller_error());
    }
}
