//! Search index generations
//!
//! A generation is an immutable in-RAM tantivy index built from one
//! projection of the corpus, plus the completion structures and the
//! projected documents themselves. [`SearchIndex`] publishes the
//! current generation behind an `Arc`: a rebuild constructs the next
//! generation off to the side and swaps it in as a unit, so readers
//! holding the previous `Arc` are never affected.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tantivy::schema::Field;
use tantivy::tokenizer::TextAnalyzer;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, Searcher};
use tracing::info;

use super::completion::CompletionIndex;
use super::projector::{project_corpus, VerseDocument};
use super::schema::IndexSchema;
use super::tokenizer;
use crate::core::corpus::CorpusStore;
use crate::core::error::{FurqanError, Result};

/// One immutable build of the search index
pub struct IndexGeneration {
    pub generation: u64,
    pub built_at: DateTime<Utc>,
    pub fields: IndexSchema,
    index: Index,
    reader: IndexReader,
    documents: Vec<VerseDocument>,
    completions: CompletionIndex,
}

impl std::fmt::Debug for IndexGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexGeneration")
            .field("generation", &self.generation)
            .field("built_at", &self.built_at)
            .field("documents", &self.documents.len())
            .finish()
    }
}

impl IndexGeneration {
    /// Index the given documents (expected in corpus order)
    pub fn build(
        generation: u64,
        documents: Vec<VerseDocument>,
        writer_memory_bytes: usize,
    ) -> Result<Self> {
        let fields = IndexSchema::build();
        let index = Index::create_in_ram(fields.schema.clone());
        tokenizer::register(&index);

        // Single writer thread keeps the corpus in one segment
        let mut writer: IndexWriter = index
            .writer_with_num_threads(1, writer_memory_bytes)
            .map_err(|e| FurqanError::IndexingFailed(format!("Failed to create writer: {e}")))?;

        for doc in &documents {
            writer.add_document(fields.document(doc)?).map_err(|e| {
                FurqanError::IndexingFailed(format!("Failed to add verse {}: {e}", doc.id))
            })?;
        }
        writer
            .commit()
            .map_err(|e| FurqanError::IndexingFailed(format!("Failed to commit: {e}")))?;
        writer
            .wait_merging_threads()
            .map_err(|e| FurqanError::IndexingFailed(format!("Failed to finish merges: {e}")))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| FurqanError::IndexingFailed(format!("Failed to create reader: {e}")))?;

        let completions = CompletionIndex::build(&documents);

        Ok(Self {
            generation,
            built_at: Utc::now(),
            fields,
            index,
            reader,
            documents,
            completions,
        })
    }

    pub fn searcher(&self) -> Searcher {
        self.reader.searcher()
    }

    /// Analyzer configured for a field
    pub fn analyzer(&self, field: Field) -> Result<TextAnalyzer> {
        self.index
            .tokenizer_for_field(field)
            .map_err(|e| FurqanError::SearchFailed(format!("Missing analyzer: {e}")))
    }

    /// Projected documents in corpus order
    pub fn documents(&self) -> &[VerseDocument] {
        &self.documents
    }

    pub fn completions(&self) -> &CompletionIndex {
        &self.completions
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Holder of the current index generation
pub struct SearchIndex {
    current: RwLock<Option<Arc<IndexGeneration>>>,
    next_generation: AtomicU64,
    writer_memory_bytes: usize,
}

impl SearchIndex {
    pub fn new(writer_memory_mb: usize) -> Self {
        Self {
            current: RwLock::new(None),
            next_generation: AtomicU64::new(1),
            writer_memory_bytes: writer_memory_mb * 1_000_000,
        }
    }

    /// Current generation, or `IndexUnavailable` before the first build
    pub fn current(&self) -> Result<Arc<IndexGeneration>> {
        self.current.read().clone().ok_or_else(|| {
            FurqanError::IndexUnavailable("the search index is still being built".to_string())
        })
    }

    /// Number of the current generation, if any
    pub fn generation(&self) -> Option<u64> {
        self.current.read().as_ref().map(|g| g.generation)
    }

    /// Build a new generation from documents and publish it
    pub fn rebuild(&self, documents: Vec<VerseDocument>) -> Result<Arc<IndexGeneration>> {
        let start = Instant::now();
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let built = Arc::new(IndexGeneration::build(
            generation,
            documents,
            self.writer_memory_bytes,
        )?);

        {
            let mut current = self.current.write();
            // A slower concurrent rebuild must not replace a newer generation
            if current.as_ref().map_or(true, |c| c.generation < generation) {
                *current = Some(Arc::clone(&built));
            }
        }
        info!(
            generation,
            documents = built.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search index generation published"
        );
        Ok(built)
    }

    /// Project the store and publish a new generation
    pub fn rebuild_from_store(&self, store: &CorpusStore) -> Result<Arc<IndexGeneration>> {
        self.rebuild(project_corpus(store)?)
    }
}

impl std::fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex")
            .field("generation", &self.generation())
            .finish()
    }
}
