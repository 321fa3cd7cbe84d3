//! Response data types shared by the HTTP API and the CLI.

use serde::Serialize;

use crate::core::corpus::{Census, Chapter};
use crate::core::pagination::OffsetPage;
use crate::core::search::SearchHit;

/// Chapter with the number of verses it holds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterResponse {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub verse_count: usize,
}

/// Corpus entity counts
pub type MetadataResponse = Census;

/// One page of search results
pub type SearchResponse = OffsetPage<SearchHit>;

/// Health check response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResponse {
    /// `ok` once an index generation is published, `starting` before
    pub status: &'static str,
    pub version: &'static str,
    pub index_generation: Option<u64>,
}

impl HealthResponse {
    pub fn new(index_generation: Option<u64>) -> Self {
        Self {
            status: if index_generation.is_some() {
                "ok"
            } else {
                "starting"
            },
            version: env!("CARGO_PKG_VERSION"),
            index_generation,
        }
    }
}
