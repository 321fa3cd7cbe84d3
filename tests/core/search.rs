//! Search and completion through the service layer

use furqan::core::error::FurqanError;
use furqan::core::search::SearchHit;

use crate::common::{create_test_services, params, FIXTURE_VERSES};

fn references(hits: &[SearchHit]) -> Vec<(u16, u16)> {
    hits.iter()
        .map(|hit| (hit.document.chapter.number, hit.document.number))
        .collect()
}

#[test]
fn test_weighted_search() {
    let (services, _corpus) = create_test_services(true);

    let page = services
        .search("/search/verses", &params(&[("search", "الصيام")]))
        .unwrap();
    assert_eq!(page.count, 2);
    assert_eq!(references(&page.results), vec![(2, 183), (2, 187)]);
    assert!(page.results.iter().all(|hit| hit.score > 0.0));
}

#[test]
fn test_simple_query_string() {
    let (services, _corpus) = create_test_services(true);
    let search = |q: &str| {
        let page = services
            .search(
                "/search/verses",
                &params(&[("search_simple_query_string", q)]),
            )
            .unwrap();
        references(&page.results)
    };

    assert_eq!(search("\"لعنة الله\""), vec![(2, 161)]);
    assert_eq!(search("(لعنة | الله)"), vec![(1, 1), (2, 161), (2, 198)]);
    assert_eq!(search("\"لعلكم تتقون\""), vec![(2, 21), (2, 183)]);
    assert_eq!(search("الرح*"), vec![(1, 1), (1, 3)]);
    assert_eq!(search("الله -لعنة"), vec![(1, 1), (2, 198)]);
}

#[test]
fn test_malformed_simple_query() {
    let (services, _corpus) = create_test_services(true);
    let err = services
        .search(
            "/search/verses",
            &params(&[("search_simple_query_string", "(لعنة | الله")]),
        )
        .unwrap_err();
    assert!(err.is_bad_request());
}

#[test]
fn test_ordering_and_unknown_field() {
    let (services, _corpus) = create_test_services(true);

    let page = services
        .search(
            "/search/verses",
            &params(&[("search", "الضالين"), ("ordering", "-chapter")]),
        )
        .unwrap();
    assert_eq!(references(&page.results), vec![(2, 198), (1, 7)]);

    match services.search("/search/verses", &params(&[("ordering", "aya")])) {
        Err(FurqanError::InvalidQueryField {
            field, suggestion, ..
        }) => {
            assert_eq!(field, "aya");
            assert_eq!(suggestion.as_deref(), Some("number"));
        }
        other => panic!("Expected InvalidQueryField, got {other:?}"),
    }
}

#[test]
fn test_result_pages() {
    let (services, _corpus) = create_test_services(true);
    let base = [("page_size", "5")];

    let first = services.search("/search/verses", &params(&base)).unwrap();
    assert_eq!(first.count, FIXTURE_VERSES.len());
    assert_eq!(first.results.len(), 5);
    assert_eq!(
        first.next.as_deref(),
        Some("/search/verses?page_size=5&page=2")
    );
    assert!(first.previous.is_none());

    let last = services
        .search(
            "/search/verses",
            &params(&[("page_size", "5"), ("page", "last")]),
        )
        .unwrap();
    assert_eq!(
        references(&last.results),
        vec![(2, 183), (2, 187), (2, 198)]
    );
    assert!(last.next.is_none());

    let err = services
        .search(
            "/search/verses",
            &params(&[("page_size", "5"), ("page", "4")]),
        )
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_completion() {
    let (services, _corpus) = create_test_services(true);

    let response = services
        .suggest(&params(&[
            ("clean_text__completion", "يا"),
            ("chapter__completion", "ال"),
        ]))
        .unwrap();

    let verses: Vec<u16> = response["clean_text__completion"][0]
        .options
        .iter()
        .map(|o| o.source.number)
        .collect();
    assert_eq!(verses, vec![183, 104, 21]);

    let chapters: Vec<&str> = response["chapter__completion"][0]
        .options
        .iter()
        .map(|o| o.text.as_str())
        .collect();
    assert_eq!(chapters, vec!["البقرة", "الفاتحة"]);
}

#[test]
fn test_rebuild_publishes_new_generation() {
    let (services, _corpus) = create_test_services(true);
    assert_eq!(services.health().index_generation, Some(1));

    let generation = services.build_index().unwrap();
    assert_eq!(generation.len(), FIXTURE_VERSES.len());
    assert_eq!(services.health().index_generation, Some(2));
    assert_eq!(services.health().status, "ok");
}
