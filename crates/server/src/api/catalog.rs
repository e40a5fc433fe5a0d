//! Catalog API handlers.
//!
//! The only surface external callers get: range/filter queries, per-entry
//! lookup, genre tallies, and cache status. Callers see valid data or "no
//! data", never an internal parse error.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use marquee_core::Entry;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CatalogQueryParams {
    #[serde(default = "default_from")]
    pub from: i64,
    #[serde(default = "default_to")]
    pub to: i64,
    #[serde(default = "default_filter")]
    pub genre: String,
    #[serde(default = "default_filter", rename = "type")]
    pub kind: String,
}

fn default_from() -> i64 {
    1
}

fn default_to() -> i64 {
    100
}

fn default_filter() -> String {
    "all".to_string()
}

#[derive(Debug, Serialize)]
pub struct CatalogListResponse {
    pub entries: Vec<Entry>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    /// Genre -> number of entries carrying it within the queried range.
    pub genres: BTreeMap<String, u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub last_updated: i64,
    pub active_entries: usize,
    pub fallback_entries: usize,
    pub empty: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/catalog
///
/// A filtered slice of the catalog, in catalog order.
pub async fn list_catalog(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogQueryParams>,
) -> Result<Json<CatalogListResponse>, impl IntoResponse> {
    match state
        .cache()
        .range(params.from, params.to, &params.genre, &params.kind)
    {
        Ok(entries) => {
            let total = entries.len();
            Ok(Json(CatalogListResponse { entries, total }))
        }
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// GET /api/v1/catalog/genres
///
/// Genre frequencies over the queried range.
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogQueryParams>,
) -> Result<Json<GenresResponse>, impl IntoResponse> {
    match state
        .cache()
        .range(params.from, params.to, &params.genre, &params.kind)
    {
        Ok(entries) => {
            let mut genres: BTreeMap<String, u32> = BTreeMap::new();
            for entry in &entries {
                for genre in &entry.genres {
                    *genres.entry(genre.clone()).or_default() += 1;
                }
            }
            Ok(Json(GenresResponse { genres }))
        }
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// GET /api/v1/catalog/status
///
/// Cache freshness and size.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let cache = state.cache();
    Json(StatusResponse {
        last_updated: cache.last_updated(),
        active_entries: cache.len(),
        fallback_entries: cache.fallback_len(),
        empty: cache.is_empty(),
    })
}

/// GET /api/v1/catalog/{id}
///
/// A single entry by id.
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Entry>, impl IntoResponse> {
    match state.cache().entry_by_id(&id) {
        Some(entry) => Ok(Json(entry)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Entry not found: {}", id),
            }),
        )),
    }
}
