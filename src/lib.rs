//! Furqan - read-only scripture corpus API
//!
//! Serves a fixed corpus of 30 parts, 114 chapters and 6236 verses
//! with relational lookups, weighted full-text search via Tantivy,
//! boolean phrase queries, prefix completion and cursor pagination.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg
//!   - corpus (model, validation, store, seeding and snapshot)
//!   - search (projection, index generations, query planning)
//!   - pagination (cursor and page-number paging)
//!   - services (unified service container)
//!
//! - **http**: REST API adapter (depends on core)
//!   - handlers, router, middleware, error mapping
//!
//! - **cli**: command line adapter (depends on core)

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP REST adapter
pub mod http;

// Command line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{FurqanError, Result};
pub use core::services::Services;
