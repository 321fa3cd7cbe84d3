//! Core domain logic (protocol-agnostic)
//!
//! This module contains all logic that is independent of the
//! transport (HTTP or CLI).
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Response data structures
//! - **xdg**: XDG directory handling
//! - **corpus**: Parts, chapters and verses; validation, seeding, snapshot
//! - **search**: Projection, tantivy index generations, query planning
//! - **pagination**: Cursor and page-number paging
//! - **services**: Unified service container

pub mod config;
pub mod corpus;
pub mod error;
pub mod pagination;
pub mod search;
pub mod services;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{FurqanError, Result};
pub use services::Services;
