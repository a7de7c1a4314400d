//! Async facade over a [`TodoStorage`] backend.
//!
//! Every operation runs the blocking backend call on tokio's blocking pool and
//! resolves once that call's transaction has committed. Operations awaited
//! one after another therefore always see each other's writes.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::storage::{
    FilterSettings, Project, SqliteStorage, StoreMetadata, Task, TaskStatus, TodoStorage,
};

/// Cloneable async handle to a todo storage backend.
pub struct TodoStore<S = SqliteStorage> {
    storage: Arc<S>,
}

impl<S> Clone for TodoStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl TodoStore<SqliteStorage> {
    /// Open the SQLite database named by `config`, creating or upgrading it.
    pub async fn open(config: StoreConfig) -> Result<Self> {
        let storage = tokio::task::spawn_blocking(move || SqliteStorage::open(config)).await??;
        Ok(Self::new(storage))
    }
}

impl<S: TodoStorage + 'static> TodoStore<S> {
    /// Wrap an already-open backend.
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// Borrow the backend for direct blocking calls.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&S) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || op(storage.as_ref())).await?
    }

    /// Storage metadata. See [`TodoStorage::metadata`].
    pub async fn metadata(&self) -> Result<StoreMetadata> {
        self.run(|storage| storage.metadata()).await
    }

    /// Insert or overwrite a project. See [`TodoStorage::add_project`].
    pub async fn add_project(&self, project: Project) -> Result<()> {
        self.run(move |storage| storage.add_project(&project)).await
    }

    /// Every stored project, timestamps rehydrated at every depth.
    ///
    /// See [`TodoStorage::get_all_projects`].
    pub async fn get_all_projects(&self) -> Result<Vec<Project>> {
        self.run(|storage| storage.get_all_projects()).await
    }

    /// One project by id, or `None`. See [`TodoStorage::get_project`].
    pub async fn get_project(&self, project_id: impl Into<String>) -> Result<Option<Project>> {
        let project_id = project_id.into();
        self.run(move |storage| storage.get_project(&project_id)).await
    }

    /// Remove a project; unknown ids resolve. See [`TodoStorage::delete_project`].
    pub async fn delete_project(&self, project_id: impl Into<String>) -> Result<()> {
        let project_id = project_id.into();
        self.run(move |storage| storage.delete_project(&project_id)).await
    }

    /// Replace a project record. See [`TodoStorage::update_project`].
    pub async fn update_project(&self, project: Project) -> Result<()> {
        self.run(move |storage| storage.update_project(&project)).await
    }

    /// Append a top-level task.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::ProjectNotFound` if no project has this id.
    /// See [`TodoStorage::add_task_to_project`].
    pub async fn add_task_to_project(
        &self,
        project_id: impl Into<String>,
        task: Task,
    ) -> Result<()> {
        let project_id = project_id.into();
        self.run(move |storage| storage.add_task_to_project(&project_id, &task)).await
    }

    /// Remove a top-level task; nested subtasks are not searched.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::ProjectNotFound` if no project has this id.
    /// See [`TodoStorage::delete_task_from_project`].
    pub async fn delete_task_from_project(
        &self,
        project_id: impl Into<String>,
        task_id: impl Into<String>,
    ) -> Result<()> {
        let project_id = project_id.into();
        let task_id = task_id.into();
        self.run(move |storage| storage.delete_task_from_project(&project_id, &task_id)).await
    }

    /// Overwrite the singleton filter settings. See [`TodoStorage::add_filters`].
    pub async fn add_filters(
        &self,
        project_id: impl Into<String>,
        status: Vec<TaskStatus>,
        name: impl Into<String>,
        tag: Vec<String>,
    ) -> Result<()> {
        let project_id = project_id.into();
        let name = name.into();
        self.run(move |storage| storage.add_filters(&project_id, &status, &name, &tag)).await
    }

    /// The filter settings, or `None` if never written. See [`TodoStorage::get_filters`].
    pub async fn get_filters(&self) -> Result<Option<FilterSettings>> {
        self.run(|storage| storage.get_filters()).await
    }

    /// All filter records (at most one). See [`TodoStorage::get_all_filters`].
    pub async fn get_all_filters(&self) -> Result<Vec<FilterSettings>> {
        self.run(|storage| storage.get_all_filters()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_clones_share_backend() {
        let dir = TempDir::new().unwrap();
        let store = TodoStore::open(StoreConfig::new(dir.path().join("todo.db")))
            .await
            .unwrap();
        let other = store.clone();

        store
            .add_project(Project::new("Shared").with_id("p1"))
            .await
            .unwrap();

        let projects = other.get_all_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Shared");
    }
}
