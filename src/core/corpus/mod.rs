//! Corpus store
//!
//! Owns the relational view of the corpus: parts, chapters and
//! verses with their range checks, uniqueness rules and deletion
//! guards.
//!
//! - **model**: entity types and deterministic identifiers
//! - **validate**: per-entity range and shape checks
//! - **store**: in-memory store with integrity enforcement
//! - **seed**: dataset ingestion and snapshot persistence

pub mod model;
pub mod seed;
pub mod store;
pub mod validate;

pub use model::{Chapter, Part, Verse, VerseKey};
pub use seed::{load_corpus, seed_store, CorpusSnapshot, Dataset};
pub use store::{Census, CorpusBatch, CorpusStore};
