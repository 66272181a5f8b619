//! REST API handlers.
//!
//! Three operations backed by the core: full schema, paginated table reads,
//! and generated model stubs, plus a health probe. Each handler recomputes
//! the schema from the catalog; callers needing freshness guarantees simply
//! re-request.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use indexmap::IndexMap;
use schemascope_core::{build_select, generate_models, Error, QueryParams, Schema};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::Record;

use super::AppState;

/// Build the API router with all endpoints.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/schema", get(schema))
        .route("/table/{table_name}", get(table_rows))
        .route("/models", get(models))
}

// === Request/Response types ===

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct TableQuery {
    filter: Option<String>,
    sort: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

impl From<TableQuery> for QueryParams {
    fn from(q: TableQuery) -> Self {
        QueryParams {
            filter: q.filter,
            sort: q.sort,
            page: q.page,
            limit: q.limit,
        }
    }
}

/// Core error carried to the HTTP boundary.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::UnknownTable(_) => StatusCode::NOT_FOUND,
            Error::UnknownColumn(_)
            | Error::InvalidFilterSyntax(_)
            | Error::InvalidPagination { .. } => StatusCode::BAD_REQUEST,
            Error::PoolExhausted => StatusCode::SERVICE_UNAVAILABLE,
            Error::CatalogUnavailable(_) | Error::QueryExecutionFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

// === Handlers ===

/// GET /health - Health check with version
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /schema - Full schema snapshot
async fn schema(State(state): State<Arc<AppState>>) -> Result<Json<Schema>, ApiError> {
    let schema = state.catalog.crawl_schema().await?;
    Ok(Json(schema))
}

/// GET /table/{table_name} - Filtered, sorted, paginated records
async fn table_rows(
    State(state): State<Arc<AppState>>,
    Path(table_name): Path<String>,
    Query(params): Query<TableQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let schema = state.catalog.crawl_schema().await?;
    let table = schema
        .get_table(&table_name)
        .ok_or_else(|| Error::UnknownTable(table_name.clone()))?;
    let query = build_select(&table_name, table, &params.into())?;
    let rows = state.catalog.fetch_rows(&query).await?;
    Ok(Json(rows))
}

/// GET /models - Generated model stubs keyed by table name
async fn models(
    State(state): State<Arc<AppState>>,
) -> Result<Json<IndexMap<String, String>>, ApiError> {
    let schema = state.catalog.crawl_schema().await?;
    Ok(Json(generate_models(&schema)))
}
