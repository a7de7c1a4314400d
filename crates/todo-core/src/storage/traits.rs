//! Storage engine trait definition.
//!
//! `TodoStorage` is the blocking interface every backend implements. The
//! async [`crate::store::TodoStore`] facade drives any implementation from a
//! tokio runtime.

use super::types::{FilterSettings, Project, StoreMetadata, Task, TaskStatus};
use crate::error::Result;

/// Storage interface for projects, their tasks, and the filter settings.
///
/// All implementations must ensure:
/// - Each call runs in its own transaction and returns only after it commits
/// - Project writes replace the whole record
/// - Tasks read back carry date-typed timestamps at every depth
pub trait TodoStorage: Send + Sync {
    /// Get storage metadata.
    fn metadata(&self) -> Result<StoreMetadata>;

    // --- Project operations ---

    /// Insert a project, or overwrite the record with the same id.
    fn add_project(&self, project: &Project) -> Result<()>;

    /// List every stored project, ordered by id.
    fn get_all_projects(&self) -> Result<Vec<Project>>;

    /// Get a project by id.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(project))` if found, `Ok(None)` if not found.
    fn get_project(&self, project_id: &str) -> Result<Option<Project>>;

    /// Remove a project. Removing an unknown id is not an error.
    fn delete_project(&self, project_id: &str) -> Result<()>;

    /// Replace a project record entirely (creates it if absent).
    fn update_project(&self, project: &Project) -> Result<()>;

    // --- Task operations ---

    /// Append a task to the end of a project's top-level task list.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::ProjectNotFound` if no project has this id.
    fn add_task_to_project(&self, project_id: &str, task: &Task) -> Result<()>;

    /// Remove the top-level task with this id.
    ///
    /// Nested subtasks are not searched. A task id that matches nothing is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::ProjectNotFound` if no project has this id.
    fn delete_task_from_project(&self, project_id: &str, task_id: &str) -> Result<()>;

    // --- Filter operations ---

    /// Overwrite the singleton filter settings.
    fn add_filters(
        &self,
        project_id: &str,
        status: &[TaskStatus],
        name: &str,
        tag: &[String],
    ) -> Result<()>;

    /// Get the filter settings, or `None` if they were never written.
    fn get_filters(&self) -> Result<Option<FilterSettings>>;

    /// List all filter settings records (at most one).
    fn get_all_filters(&self) -> Result<Vec<FilterSettings>>;
}
