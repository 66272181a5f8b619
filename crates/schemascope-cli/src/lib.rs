//! schemascope CLI: configuration loading, the live MySQL catalog reader,
//! and the HTTP serve mode. The schema model, query builder and model
//! generator live in `schemascope-core`.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod server;
