//! Stored record shapes and their rehydration into domain types.
//!
//! Records are kept as JSON documents. Timestamps inside them are plain
//! serializable values (RFC 3339 text, or epoch milliseconds written by
//! older clients) and are turned back into `DateTime<Utc>` on every read.
//! Fields this crate does not know about are carried through untouched.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, TodoError};
use crate::storage::types::{FilterSettings, Project, Task, TaskStatus};

/// Key of the single filter-settings row.
pub const FILTERS_KEY: i64 = 1;

/// Largest distance from the epoch a browser date can hold, in milliseconds.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// Timestamp as it sits in storage, before rehydration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredTimestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

impl StoredTimestamp {
    fn rehydrate(&self) -> Result<DateTime<Utc>> {
        match self {
            StoredTimestamp::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(*ms)
                .ok_or_else(|| TodoError::Storage(format!("Timestamp out of range: {}", ms))),
            StoredTimestamp::FractionalMillis(ms) => {
                if !ms.is_finite() || ms.abs() > MAX_EPOCH_MILLIS {
                    return Err(TodoError::Storage(format!("Timestamp out of range: {}", ms)));
                }
                // Sub-millisecond parts are dropped, as browser dates do.
                DateTime::<Utc>::from_timestamp_millis(ms.trunc() as i64)
                    .ok_or_else(|| TodoError::Storage(format!("Timestamp out of range: {}", ms)))
            }
            StoredTimestamp::Text(text) => Ok(DateTime::parse_from_rfc3339(text)
                .map_err(|e| TodoError::Storage(format!("Invalid timestamp '{}': {}", text, e)))?
                .with_timezone(&Utc)),
        }
    }
}

impl From<&DateTime<Utc>> for StoredTimestamp {
    fn from(value: &DateTime<Utc>) -> Self {
        StoredTimestamp::Text(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

/// Raw task document, before timestamps are rehydrated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTask {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<StoredTask>,
    pub created_at: StoredTimestamp,
    pub updated_at: StoredTimestamp,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&Task> for StoredTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            status: task.status,
            tags: task.tags.clone(),
            subtasks: task.subtasks.iter().map(StoredTask::from).collect(),
            created_at: StoredTimestamp::from(&task.created_at),
            updated_at: StoredTimestamp::from(&task.updated_at),
            extra: Map::new(),
        }
    }
}

/// Raw project document as held in the `projects` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<StoredTask>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredProject {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TodoError::Storage(format!("Invalid project JSON: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| TodoError::Storage(format!("Failed to serialize project: {}", e)))
    }
}

impl From<&Project> for StoredProject {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            tasks: project.tasks.iter().map(StoredTask::from).collect(),
            extra: Map::new(),
        }
    }
}

impl TryFrom<&StoredProject> for Project {
    type Error = TodoError;

    fn try_from(row: &StoredProject) -> Result<Self> {
        Ok(Project {
            id: row.id.clone(),
            name: row.name.clone(),
            tasks: rehydrate_tasks(&row.tasks)?,
        })
    }
}

/// Rebuild a task tree with date-typed timestamps, depth first.
///
/// The input is left untouched; on error no partial tree escapes.
pub fn rehydrate_tasks(tasks: &[StoredTask]) -> Result<Vec<Task>> {
    tasks.iter().map(rehydrate_task).collect()
}

fn rehydrate_task(raw: &StoredTask) -> Result<Task> {
    Ok(Task {
        id: raw.id.clone(),
        title: raw.title.clone(),
        status: raw.status,
        tags: raw.tags.clone(),
        subtasks: rehydrate_tasks(&raw.subtasks)?,
        created_at: raw.created_at.rehydrate()?,
        updated_at: raw.updated_at.rehydrate()?,
    })
}

/// The singleton filter document, `{ id: 1, projectId, status, name, tag }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFilters {
    pub id: i64,
    #[serde(flatten)]
    pub settings: FilterSettings,
}

impl StoredFilters {
    pub fn singleton(settings: FilterSettings) -> Self {
        Self {
            id: FILTERS_KEY,
            settings,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TodoError::Storage(format!("Invalid filters JSON: {}", e)))
    }
}
