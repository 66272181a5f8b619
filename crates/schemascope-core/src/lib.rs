//! Core engine for schemascope: a normalized schema model built from
//! database catalog metadata, a query builder that turns untrusted request
//! parameters into bounded parameterized SELECT statements, and a generator
//! for skeletal data-model stubs.
//!
//! This crate is pure computation over already-fetched catalog rows. The
//! database round-trips (catalog introspection, record fetches) live in the
//! CLI crate behind its `Catalog` trait.

pub mod builder;
pub mod error;
pub mod modelgen;
pub mod query;
pub mod types;

pub use builder::{build_schema, RawColumn, RawForeignKey, RawIndex, RawTable};
pub use error::Error;
pub use modelgen::{generate_models, type_name};
pub use query::{build_select, QueryParams, SelectQuery, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use types::{Column, ForeignKey, Index, KeyRole, Schema, Table};
