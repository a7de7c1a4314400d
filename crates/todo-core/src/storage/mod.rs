//! Storage abstraction for todo data.
//!
//! This module defines the `TodoStorage` trait and the records it stores:
//! projects (each owning a tree of tasks) and one filter-settings record.
//!
//! ## Architecture
//!
//! The storage layer is backend-agnostic:
//! - SQLite file with JSON records (`SqliteStorage`)
//!
//! All backends implement the `TodoStorage` trait, which gives a consistent
//! interface for project, task and filter management.

pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export public types
pub use sqlite::{SqliteStorage, SCHEMA_VERSION};
pub use traits::TodoStorage;
pub use types::{FilterSettings, Project, StoreMetadata, Task, TaskStatus};
