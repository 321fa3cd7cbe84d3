//! Verse search over tantivy.
//!
//! Verses are projected into flat documents, indexed into immutable
//! in-RAM generations and queried through the [`QueryPlanner`]:
//! weighted multi-field matching, simple boolean query strings,
//! ordering and prefix completion.

pub mod completion;
pub mod index;
pub mod planner;
pub mod projector;
pub mod query;
pub mod schema;
pub mod tokenizer;

pub use completion::{CompletionIndex, SuggestField};
pub use index::{IndexGeneration, SearchIndex};
pub use planner::{
    parse_ordering, OrderField, OrderKey, PlannerSettings, QueryPlanner, RankedResults,
    SearchHit, SearchRequest, SuggestEntry, SuggestOption, SuggestResponse, ORDERING_PARAM,
    SEARCH_PARAM, SIMPLE_QUERY_PARAM,
};
pub use projector::{project, project_corpus, split_position, VerseDocument};
pub use query::{parse_simple_query, Operator, QueryNode};
pub use schema::{IndexSchema, SCHEMA_VERSION};
