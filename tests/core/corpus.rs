//! Corpus seeding and snapshot tests

use furqan::core::corpus::{Chapter, CorpusSnapshot, Dataset, Part, Verse, VerseKey};
use furqan::core::error::FurqanError;
use furqan::core::services::Services;

use crate::common::{create_test_services, TestCorpus, FIXTURE_VERSES};

#[test]
fn test_seed_writes_snapshot() {
    let (services, corpus) = create_test_services(false);
    let snapshot = corpus.config().storage.snapshot_path();
    assert!(snapshot.exists(), "Expected snapshot at {snapshot:?}");

    let census = services.metadata();
    assert_eq!(census.parts, 2);
    assert_eq!(census.chapters, 2);
    assert_eq!(census.verses, FIXTURE_VERSES.len());
}

#[test]
fn test_reload_from_snapshot_keeps_identifiers() {
    let (services, corpus) = create_test_services(false);
    let first = services.chapter_verse(2, 183).unwrap();

    // Dataset files are gone; only the snapshot can answer
    std::fs::remove_file(&corpus.verses_file).unwrap();
    let reloaded = Services::load(corpus.config()).unwrap();
    let second = reloaded.chapter_verse(2, 183).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.clean_text, second.clean_text);
    assert_eq!(reloaded.metadata(), services.metadata());
}

#[test]
fn test_part_labels_and_verse_counts() {
    let (services, _corpus) = create_test_services(false);

    let part = services.part(2).unwrap();
    assert_eq!(part.number_worded_en.as_deref(), Some("Second"));
    assert_eq!(part.number_worded_ar.as_deref(), Some("الثاني"));

    let fatiha = services.chapter(1).unwrap();
    assert_eq!(fatiha.verse_count, 7);
    assert_eq!(fatiha.chapter.clean_name_ar, "الفاتحة");
    assert_eq!(services.chapter(2).unwrap().verse_count, 6);

    let verse = services.chapter_verse(1, 4).unwrap();
    assert_eq!(verse.page, 1);
    assert_eq!((verse.line_start, verse.line_end), (2, 3));
}

#[test]
fn test_complete_census_required_by_default() {
    let corpus = TestCorpus::new();
    let mut config = corpus.config();
    config.corpus.require_complete = true;

    let err = Services::load(config).err().unwrap();
    assert!(
        matches!(err, FurqanError::Integrity(_)),
        "Expected Integrity error, got {err:?}"
    );
}

#[test]
fn test_missing_dataset_is_config_error() {
    let corpus = TestCorpus::new();
    let mut config = corpus.config();
    config.corpus.verses_file = None;

    let err = Services::load(config).err().unwrap();
    assert!(matches!(err, FurqanError::ConfigError(_)));
}

#[test]
fn test_deletion_guards_on_snapshot_store() {
    let (_services, corpus) = create_test_services(false);
    let mut store = CorpusSnapshot::read(&corpus.config().storage.snapshot_path())
        .unwrap()
        .into_store()
        .unwrap();

    match store.delete_part(1) {
        Err(FurqanError::ProtectedReference { references, .. }) => assert_eq!(references, 9),
        other => panic!("Expected ProtectedReference, got {other:?}"),
    }

    for number in [1, 2, 3, 4, 5, 6, 7] {
        store.delete_verse(VerseKey::new(1, number)).unwrap();
    }
    assert_eq!(store.delete_chapter(1).unwrap().number, 1);
    assert!(store.chapter(1).unwrap_err().is_not_found());
}

#[test]
fn test_duplicate_ordinals_leave_store_unchanged() {
    let (_services, corpus) = create_test_services(false);
    let mut store = CorpusSnapshot::read(&corpus.config().storage.snapshot_path())
        .unwrap()
        .into_store()
        .unwrap();
    let before = store.census();

    assert!(store.insert_part(Part::new(1)).unwrap_err().is_conflict());
    assert!(store
        .insert_chapter(Chapter::new(2, "Ali 'Imran", "آل عِمۡرَان", "آل عمران"))
        .unwrap_err()
        .is_conflict());
    assert!(store
        .insert_verse(Verse::new(VerseKey::new(2, 183), 2, "نص", "نص"))
        .unwrap_err()
        .is_conflict());

    assert_eq!(store.census(), before);
}

#[test]
fn test_unmapped_chapter_name_is_rejected() {
    let corpus = TestCorpus::new();
    std::fs::write(&corpus.chapter_names_file, r#"{"الفَاتِحة": "الفاتحة"}"#).unwrap();

    let dataset = Dataset::from_files(&corpus.verses_file, &corpus.chapter_names_file, None)
        .unwrap();
    let err = dataset.into_batch().unwrap_err();
    assert!(err.is_bad_request(), "Expected validation error, got {err:?}");
}
