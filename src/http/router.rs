//! Route table for the furqan API

use std::sync::Arc;
use std::time::Duration;

use axum::{
    handler::Handler,
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

use super::handlers::*;
use super::middleware::log_request;
use crate::core::services::Services;

/// GET route that answers every other verb with 405
fn read_only<H, T>(handler: H) -> MethodRouter<Arc<Services>>
where
    H: Handler<T, Arc<Services>>,
    T: 'static,
{
    get(handler).fallback(method_not_allowed_handler)
}

/// Build the API router over shared services
pub fn build_router(services: Arc<Services>) -> Router {
    let timeout = Duration::from_secs(services.config.limits.request_timeout_sec);

    Router::new()
        .route("/health", read_only(health_handler))
        .route("/parts", read_only(list_parts_handler))
        .route("/parts/:number", read_only(part_handler))
        .route("/chapters", read_only(list_chapters_handler))
        .route("/chapters/:number", read_only(chapter_handler))
        .route("/chapters/:number/verses", read_only(chapter_verses_handler))
        .route(
            "/chapters/:number/verses/:verse",
            read_only(chapter_verse_handler),
        )
        .route("/verses", read_only(list_verses_handler))
        .route("/verses/:id", read_only(verse_handler))
        .route("/metadata", read_only(metadata_handler))
        .route("/search/verses", read_only(search_handler))
        .route("/search/verses/suggest", read_only(suggest_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn(log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .with_state(services)
}
