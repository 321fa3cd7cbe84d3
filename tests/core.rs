//! Core module integration tests
//!
//! Tests for protocol-agnostic functionality:
//! - Corpus: seeding, snapshot reload, integrity guards
//! - Search: weighted and boolean queries, ordering, paging, completion

mod common;

// Core submodules - tests/core/ directory
mod core {
    pub mod corpus;
    pub mod search;
}
