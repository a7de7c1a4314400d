//! # Todo Core
//!
//! Persistence layer for a to-do list application: projects holding trees of
//! tasks, the user's filter settings, and a password-based text encryption
//! helper.
//!
//! ## Architecture
//!
//! - **storage**: `TodoStorage` trait, record types, and the SQLite backend
//! - **store**: async facade that drives a backend from a tokio runtime
//! - **crypto**: fail-soft string encryption with a password
//! - **config**: database location and connection settings (TOML)
//! - **logging**: `tracing` subscriber setup for hosts and tests

pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod storage;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, TodoError};
pub use storage::{FilterSettings, Project, Task, TaskStatus, TodoStorage};
pub use store::TodoStore;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
