//! HTTP request handlers for the furqan API
//!
//! Every endpoint is read-only. Lookups answer straight from the
//! in-memory corpus; searches run on the blocking pool.

use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, Method, Uri},
    response::IntoResponse,
    Json,
};

use crate::core::corpus::{Part, Verse};
use crate::core::error::FurqanError;
use crate::core::pagination::{query_pairs, CursorPage};
use crate::core::search::SuggestResponse;
use crate::core::services::Services;
use crate::core::types::{
    ChapterResponse, HealthResponse, MetadataResponse, SearchResponse,
};

type ApiResult<T> = Result<Json<T>, FurqanError>;

/// Parse a numeric path segment; anything else is simply not found
fn ordinal(entity: &str, raw: &str) -> Result<u16, FurqanError> {
    raw.parse::<u16>()
        .map_err(|_| FurqanError::NotFound(format!("{entity} {raw}")))
}

/// Health check handler
///
/// Reports `starting` until the first index generation is published.
pub async fn health_handler(State(services): State<Arc<Services>>) -> Json<HealthResponse> {
    Json(services.health())
}

pub async fn list_parts_handler(
    State(services): State<Arc<Services>>,
    uri: Uri,
    RawQuery(query): RawQuery,
) -> ApiResult<CursorPage<Part>> {
    let params = query_pairs(query.as_deref());
    Ok(Json(services.list_parts(uri.path(), &params)?))
}

pub async fn part_handler(
    State(services): State<Arc<Services>>,
    Path(number): Path<String>,
) -> ApiResult<Part> {
    Ok(Json(services.part(ordinal("part", &number)?)?))
}

/// Chapters with their verse counts
pub async fn list_chapters_handler(
    State(services): State<Arc<Services>>,
    uri: Uri,
    RawQuery(query): RawQuery,
) -> ApiResult<CursorPage<ChapterResponse>> {
    let params = query_pairs(query.as_deref());
    Ok(Json(services.list_chapters(uri.path(), &params)?))
}

pub async fn chapter_handler(
    State(services): State<Arc<Services>>,
    Path(number): Path<String>,
) -> ApiResult<ChapterResponse> {
    Ok(Json(services.chapter(ordinal("chapter", &number)?)?))
}

/// All verses of a chapter, unpaginated
pub async fn chapter_verses_handler(
    State(services): State<Arc<Services>>,
    Path(number): Path<String>,
) -> ApiResult<Vec<Verse>> {
    Ok(Json(services.chapter_verses(ordinal("chapter", &number)?)?))
}

pub async fn chapter_verse_handler(
    State(services): State<Arc<Services>>,
    Path((chapter, verse)): Path<(String, String)>,
) -> ApiResult<Verse> {
    let chapter = ordinal("chapter", &chapter)?;
    let verse = ordinal("verse", &verse)?;
    Ok(Json(services.chapter_verse(chapter, verse)?))
}

pub async fn list_verses_handler(
    State(services): State<Arc<Services>>,
    uri: Uri,
    RawQuery(query): RawQuery,
) -> ApiResult<CursorPage<Verse>> {
    let params = query_pairs(query.as_deref());
    Ok(Json(services.list_verses(uri.path(), &params)?))
}

pub async fn verse_handler(
    State(services): State<Arc<Services>>,
    Path(id): Path<String>,
) -> ApiResult<Verse> {
    Ok(Json(services.verse(&id)?))
}

pub async fn metadata_handler(State(services): State<Arc<Services>>) -> Json<MetadataResponse> {
    Json(services.metadata())
}

/// Search handler
///
/// Accepts `search`, `search_simple_query_string`, `ordering`, `page`
/// and `page_size`.
///
/// # Errors
///
/// - `InvalidQuery` / `InvalidQueryField`: malformed query or ordering
/// - `NotFound`: page out of range
/// - `IndexUnavailable`: no index generation yet
pub async fn search_handler(
    State(services): State<Arc<Services>>,
    uri: Uri,
    RawQuery(query): RawQuery,
) -> ApiResult<SearchResponse> {
    let params = query_pairs(query.as_deref());
    let path = uri.path().to_string();

    let response = tokio::task::spawn_blocking(move || services.search(&path, &params))
        .await
        .map_err(|e| FurqanError::SearchFailed(format!("Search task failed: {e}")))??;

    Ok(Json(response))
}

/// Completion handler for `<field>__completion=<prefix>` parameters
pub async fn suggest_handler(
    State(services): State<Arc<Services>>,
    RawQuery(query): RawQuery,
) -> ApiResult<SuggestResponse> {
    let params = query_pairs(query.as_deref());

    let response = tokio::task::spawn_blocking(move || services.suggest(&params))
        .await
        .map_err(|e| FurqanError::SearchFailed(format!("Suggest task failed: {e}")))??;

    Ok(Json(response))
}

/// Any verb other than GET or HEAD on a known route
pub async fn method_not_allowed_handler(method: Method) -> impl IntoResponse {
    (
        [(header::ALLOW, "GET, HEAD")],
        FurqanError::MethodNotAllowed(method.to_string()),
    )
}

/// Unknown route
pub async fn not_found_handler(uri: Uri) -> FurqanError {
    FurqanError::NotFound(format!("route {}", uri.path()))
}
