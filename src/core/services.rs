//! Unified service container for furqan
//!
//! Provides shared access to the corpus, the search index and the
//! pagers. Both the HTTP API and the CLI go through these methods.

use std::sync::Arc;

use uuid::Uuid;

use crate::core::config::Config;
use crate::core::corpus::{load_corpus, CorpusStore, Part, Verse, VerseKey};
use crate::core::error::{FurqanError, Result};
use crate::core::pagination::{CursorPage, CursorPager, Listing, OffsetPager, PageRequest};
use crate::core::search::{
    IndexGeneration, PlannerSettings, QueryPlanner, SearchIndex, SearchRequest, SuggestResponse,
};
use crate::core::types::{ChapterResponse, HealthResponse, MetadataResponse, SearchResponse};

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Immutable corpus
    pub corpus: Arc<CorpusStore>,

    /// Current search index generation
    pub index: Arc<SearchIndex>,

    /// Query planner with the configured boosts
    pub planner: Arc<QueryPlanner>,

    listings: CursorPager,
    results: OffsetPager,
}

impl Services {
    /// Create services over an already loaded corpus
    ///
    /// The search index starts empty; call [`Services::build_index`].
    pub fn new(config: Config, corpus: CorpusStore) -> Self {
        let index = Arc::new(SearchIndex::new(config.search.writer_memory_mb));
        let planner = Arc::new(QueryPlanner::new(PlannerSettings::from_config(&config.search)));
        let listings = CursorPager::new(
            config.pagination.default_page_size,
            config.pagination.max_page_size,
        );
        let results = OffsetPager::new(
            config.pagination.default_page_size,
            config.pagination.max_page_size,
        );

        Self {
            config: Arc::new(config),
            corpus: Arc::new(corpus),
            index,
            planner,
            listings,
            results,
        }
    }

    /// Load the corpus (snapshot or seed) and create services
    pub fn load(config: Config) -> Result<Self> {
        let corpus = load_corpus(&config)?;
        Ok(Self::new(config, corpus))
    }

    /// Project the corpus and publish a new index generation
    pub fn build_index(&self) -> Result<Arc<IndexGeneration>> {
        self.index.rebuild_from_store(&self.corpus)
    }

    pub fn list_parts(&self, path: &str, params: &[(String, String)]) -> Result<CursorPage<Part>> {
        let parts = self.corpus.parts();
        let page = self.listings.paginate(
            Listing::Parts,
            &parts,
            |p| vec![u32::from(p.number)],
            path,
            params,
        )?;
        Ok(page.map(|p| p.clone()))
    }

    pub fn part(&self, number: u16) -> Result<Part> {
        self.corpus.part(number).cloned()
    }

    pub fn list_chapters(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<CursorPage<ChapterResponse>> {
        let chapters = self.corpus.chapters();
        let page = self.listings.paginate(
            Listing::Chapters,
            &chapters,
            |c| vec![u32::from(c.number)],
            path,
            params,
        )?;
        Ok(page.map(|c| ChapterResponse {
            chapter: c.clone(),
            verse_count: self.corpus.chapter_verse_count(c.number),
        }))
    }

    pub fn chapter(&self, number: u16) -> Result<ChapterResponse> {
        let chapter = self.corpus.chapter(number)?;
        Ok(ChapterResponse {
            chapter: chapter.clone(),
            verse_count: self.corpus.chapter_verse_count(number),
        })
    }

    /// Every verse of a chapter by verse number
    pub fn chapter_verses(&self, number: u16) -> Result<Vec<Verse>> {
        Ok(self
            .corpus
            .chapter_verses(number)?
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn chapter_verse(&self, chapter: u16, number: u16) -> Result<Verse> {
        self.corpus.chapter(chapter)?;
        self.corpus
            .verse(VerseKey::new(chapter, number))
            .cloned()
    }

    pub fn list_verses(&self, path: &str, params: &[(String, String)]) -> Result<CursorPage<Verse>> {
        let verses = self.corpus.verses();
        let page = self.listings.paginate(
            Listing::Verses,
            &verses,
            |v| vec![u32::from(v.chapter), u32::from(v.number)],
            path,
            params,
        )?;
        Ok(page.map(|v| v.clone()))
    }

    /// Verse by id; a malformed id is simply not found
    pub fn verse(&self, id: &str) -> Result<Verse> {
        let id = Uuid::parse_str(id)
            .map_err(|_| FurqanError::NotFound(format!("verse {id}")))?;
        self.corpus.verse_by_id(&id).cloned()
    }

    pub fn metadata(&self) -> MetadataResponse {
        self.corpus.census()
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse::new(self.index.generation())
    }

    /// Run a search and return the requested page of results
    pub fn search(&self, path: &str, params: &[(String, String)]) -> Result<SearchResponse> {
        let generation = self.index.current()?;
        let results = self
            .planner
            .search(&generation, &SearchRequest::from_pairs(params))?;
        let window = self
            .results
            .window(&PageRequest::from_pairs(params), results.count())?;
        let hits = results.fetch(window.range.clone())?;
        Ok(window.into_page(hits, path, params))
    }

    pub fn suggest(&self, params: &[(String, String)]) -> Result<SuggestResponse> {
        let generation = self.index.current()?;
        self.planner.suggest(&generation, params)
    }
}
