//! Integration tests for the furqan REST API
//!
//! Seeds the fixture corpus, builds the router and exercises lookups,
//! cursor paging, search and completion end to end.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt as TowerServiceExt;

use crate::common::{create_test_app, get_json, positions, FIXTURE_VERSES};

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[tokio::test]
async fn test_health_reports_starting_then_ok() {
    let (app, _corpus) = create_test_app(false);
    let (status, body) = get_json(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "starting");
    assert_eq!(body["index_generation"], Value::Null);

    let (app, _corpus) = create_test_app(true);
    let (_, body) = get_json(&app, "GET", "/health").await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["index_generation"], 1);
}

#[tokio::test]
async fn test_search_unavailable_before_index() {
    let (app, _corpus) = create_test_app(false);

    let (status, body) = get_json(&app, "GET", "/search/verses").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], 503);

    // Lookups do not depend on the index
    let (status, _) = get_json(&app, "GET", "/chapters/1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_writes_are_not_allowed() {
    let (app, _corpus) = create_test_app(false);

    let routes = [
        "/health",
        "/parts",
        "/parts/1",
        "/chapters",
        "/chapters/1",
        "/chapters/1/verses",
        "/chapters/1/verses/1",
        "/verses",
        "/verses/00000000-0000-0000-0000-000000000000",
        "/metadata",
        "/search/verses",
        "/search/verses/suggest",
    ];
    let requests = routes.iter().flat_map(|uri| {
        ["POST", "PUT", "PATCH", "DELETE"]
            .into_iter()
            .map(move |method| (method, *uri))
    });

    for (method, uri) in requests {
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
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{method} {uri}"
        );
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
    }
}

#[tokio::test]
async fn test_unknown_route_and_records() {
    let (app, _corpus) = create_test_app(false);

    for uri in [
        "/surahs",
        "/parts/31",
        "/chapters/3",
        "/chapters/first",
        "/chapters/1/verses/8",
        "/verses/not-a-uuid",
    ] {
        let (status, body) = get_json(&app, "GET", uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["status"], 404);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_lookups() {
    let (app, _corpus) = create_test_app(false);

    let (_, part) = get_json(&app, "GET", "/parts/1").await;
    assert_eq!(part["number_worded_en"], "First");

    let (_, chapter) = get_json(&app, "GET", "/chapters/2").await;
    assert_eq!(chapter["clean_name_ar"], "البقرة");
    assert_eq!(chapter["verse_count"], 6);

    let (_, verses) = get_json(&app, "GET", "/chapters/1/verses").await;
    let numbers: Vec<u64> = verses
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);

    let (_, verse) = get_json(&app, "GET", "/chapters/2/verses/183").await;
    let id = verse["id"].as_str().unwrap().to_string();
    let (status, by_id) = get_json(&app, "GET", &format!("/verses/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id, verse);

    let (_, metadata) = get_json(&app, "GET", "/metadata").await;
    assert_eq!(metadata["parts"], 2);
    assert_eq!(metadata["chapters"], 2);
    assert_eq!(metadata["verses"], FIXTURE_VERSES.len());
}

#[tokio::test]
async fn test_cursor_walk_over_verses() {
    let (app, _corpus) = create_test_app(false);

    let mut seen = Vec::new();
    let mut next = Some("/verses?page_size=5".to_string());
    let mut last_page = Value::Null;
    while let Some(uri) = next {
        let (status, page) = get_json(&app, "GET", &uri).await;
        assert_eq!(status, StatusCode::OK);
        for verse in page["results"].as_array().unwrap() {
            seen.push((
                verse["chapter"].as_u64().unwrap(),
                verse["number"].as_u64().unwrap(),
            ));
        }
        next = page["next"].as_str().map(str::to_string);
        last_page = page;
    }

    let expected: Vec<(u64, u64)> = FIXTURE_VERSES
        .iter()
        .map(|(_, chapter, number, _, _)| (u64::from(*chapter), u64::from(*number)))
        .collect();
    assert_eq!(seen, expected);

    // Walk back one page from the end
    let previous = last_page["previous"].as_str().unwrap().to_string();
    let (_, page) = get_json(&app, "GET", &previous).await;
    let first = &page["results"][0];
    assert_eq!((first["chapter"].as_u64(), first["number"].as_u64()), (Some(1), Some(6)));
    assert_eq!(page["results"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_bad_cursor_is_bad_request() {
    let (app, _corpus) = create_test_app(false);
    let (status, body) = get_json(&app, "GET", "/parts?cursor=not-a-cursor!").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_search_endpoint() {
    let (app, _corpus) = create_test_app(true);

    let uri = format!("/search/verses?search={}", encode("الصيام"));
    let (status, page) = get_json(&app, "GET", &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);
    assert_eq!(positions(&page), vec![(2, 183), (2, 187)]);
    assert!(page["results"][0]["score"].as_f64().unwrap() > 0.0);
    assert_eq!(page["results"][0]["part"]["number"], 2);

    let uri = format!(
        "/search/verses?search_simple_query_string={}",
        encode("\"لعنة الله\"")
    );
    let (_, page) = get_json(&app, "GET", &uri).await;
    assert_eq!(positions(&page), vec![(2, 161)]);
}

#[tokio::test]
async fn test_search_paging_links() {
    let (app, _corpus) = create_test_app(true);

    let (_, page) = get_json(&app, "GET", "/search/verses?page_size=5&page=2").await;
    assert_eq!(page["count"], FIXTURE_VERSES.len());
    assert_eq!(page["next"], "/search/verses?page_size=5&page=3");
    assert_eq!(page["previous"], "/search/verses?page_size=5");

    let (status, _) = get_json(&app, "GET", "/search/verses?page=9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_accepts_sora_ordering() {
    let (app, _corpus) = create_test_app(true);

    let (status, body) = get_json(&app, "GET", "/search/verses?ordering=-sora,number").await;
    assert_eq!(status, StatusCode::OK);
    let found = positions(&body);
    assert_eq!(found[0], (2, 21));
    assert_eq!(found[6], (1, 1));
}

#[tokio::test]
async fn test_search_errors() {
    let (app, _corpus) = create_test_app(true);

    let (status, body) = get_json(&app, "GET", "/search/verses?ordering=surah").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["suggestion"], "chapter");
    assert!(body["valid_fields"]
        .as_array()
        .unwrap()
        .contains(&Value::from("number")));

    let uri = format!(
        "/search/verses?search_simple_query_string={}",
        encode("\"لعنة")
    );
    let (status, _) = get_json(&app, "GET", &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_suggest_endpoint() {
    let (app, _corpus) = create_test_app(true);

    let uri = format!(
        "/search/verses/suggest?clean_text__completion={}",
        encode("يا")
    );
    let (status, body) = get_json(&app, "GET", &uri).await;
    assert_eq!(status, StatusCode::OK);

    let entry = &body["clean_text__completion"][0];
    assert_eq!(entry["text"], "يا");
    let numbers: Vec<u64> = entry["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["_source"]["number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![183, 104, 21]);

    let uri = format!("/search/verses/suggest?sora__completion={}", encode("ال"));
    let (status, body) = get_json(&app, "GET", &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sora__completion"][0]["options"][0]["text"], "البقرة");

    let (status, _) = get_json(&app, "GET", "/search/verses/suggest?text__completion=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
