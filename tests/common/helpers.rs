// Test helper functions

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use furqan::core::services::Services;
use furqan::http::build_router;
use serde_json::Value;
use tower::ServiceExt;

use super::fixtures::TestCorpus;

/// Seed services from the fixture dataset, optionally building the index
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(with_index: bool) -> (Arc<Services>, TestCorpus) {
    let corpus = TestCorpus::new();
    let services = Services::load(corpus.config()).expect("Failed to seed fixture corpus");
    if with_index {
        services.build_index().expect("Failed to build index");
    }
    (Arc::new(services), corpus)
}

/// Router over freshly seeded services
#[allow(dead_code)] // Used in integration tests
pub fn create_test_app(with_index: bool) -> (Router, TestCorpus) {
    let (services, corpus) = create_test_services(with_index);
    (build_router(services), corpus)
}

/// Send a request and decode the JSON body
#[allow(dead_code)] // Used in integration tests
pub async fn get_json(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

/// Owned query pairs
#[allow(dead_code)] // Used in integration tests
pub fn params(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// (chapter, verse) of each result in a JSON search page
#[allow(dead_code)] // Used in integration tests
pub fn positions(page: &Value) -> Vec<(u64, u64)> {
    page["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|hit| {
            (
                hit["chapter"]["number"].as_u64().unwrap(),
                hit["number"].as_u64().unwrap(),
            )
        })
        .collect()
}

