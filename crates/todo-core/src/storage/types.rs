//! Core data types for the storage layer.
//!
//! These are the records the UI collaborator hands to the store and gets back
//! from it. Serialized field names follow the stored wire shape (`createdAt`,
//! `projectId`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work, possibly with nested subtasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier, unique within the owning project
    pub id: String,

    pub title: String,

    pub status: TaskStatus,

    pub tags: Vec<String>,

    /// Child tasks (a tree, never a cycle)
    pub subtasks: Vec<Task>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a `todo` task with a fresh identifier and both timestamps set to now.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            status: TaskStatus::Todo,
            tags: Vec::new(),
            subtasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_subtasks(mut self, subtasks: Vec<Task>) -> Self {
        self.subtasks = subtasks;
        self
    }
}

/// A top-level container owning an ordered list of tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Storage key
    pub id: String,

    pub name: String,

    pub tasks: Vec<Task>,
}

impl Project {
    /// Create an empty project with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }
}

/// The user's active filtering criteria.
///
/// Only one of these is ever stored; each write replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSettings {
    /// Active project
    pub project_id: String,

    /// Statuses to show
    pub status: Vec<TaskStatus>,

    /// Free-text name filter
    pub name: String,

    /// Tags to show
    pub tag: Vec<String>,
}

impl FilterSettings {
    pub fn new(
        project_id: impl Into<String>,
        status: Vec<TaskStatus>,
        name: impl Into<String>,
        tag: Vec<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            status,
            name: name.into(),
            tag,
        }
    }
}

/// Metadata for a todo database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Schema version the database was last upgraded to
    pub schema_version: u32,

    /// When the database schema was first created
    pub created_at: DateTime<Utc>,
}
