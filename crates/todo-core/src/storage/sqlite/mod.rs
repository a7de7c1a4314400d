//! SQLite storage backend.
//!
//! Each operation opens its own connection, makes sure the schema is
//! current, and runs inside a single transaction that commits before the
//! call returns. Records are stored as JSON documents keyed by id.

mod row;
mod schema;

use std::fs;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{Result, TodoError};
use crate::storage::traits::TodoStorage;
use crate::storage::types::{FilterSettings, Project, StoreMetadata, Task, TaskStatus};

use row::{StoredFilters, StoredProject, StoredTask, FILTERS_KEY};
pub use schema::SCHEMA_VERSION;

/// SQLite-backed todo storage.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    config: StoreConfig,
}

impl SqliteStorage {
    /// Open (and create or upgrade if needed) the database named by `config`.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if let Some(parent) = config.path().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let storage = Self { config };
        storage.connect()?;
        debug!(path = %storage.config.path().display(), "Opened todo database");
        Ok(storage)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn connect(&self) -> Result<Connection> {
        let mut conn = Connection::open(self.config.path())?;
        conn.busy_timeout(self.config.busy_timeout())?;
        schema::ensure_schema(&mut conn)?;
        Ok(conn)
    }

    fn read_project(tx: &Transaction<'_>, project_id: &str) -> Result<Option<StoredProject>> {
        let json: Option<String> = tx
            .query_row(
                "SELECT record_json FROM projects WHERE id = ?",
                [project_id],
                |row| row.get(0),
            )
            .optional()?;
        json.as_deref().map(StoredProject::from_json).transpose()
    }

    fn write_project(tx: &Transaction<'_>, project: &StoredProject) -> Result<()> {
        tx.execute(
            "INSERT OR REPLACE INTO projects (id, record_json) VALUES (?, ?)",
            (&project.id, project.to_json()?),
        )?;
        Ok(())
    }

    fn put_project(&self, project: &Project) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        Self::write_project(&tx, &StoredProject::from(project))?;
        tx.commit()?;
        Ok(())
    }

    /// Read-modify-write of one project under a write lock.
    fn modify_project<F>(&self, project_id: &str, modify: F) -> Result<()>
    where
        F: FnOnce(&mut StoredProject),
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut project = Self::read_project(&tx, project_id)?
            .ok_or_else(|| TodoError::ProjectNotFound(project_id.to_string()))?;
        modify(&mut project);

        Self::write_project(&tx, &project)?;
        tx.commit()?;
        Ok(())
    }
}

impl TodoStorage for SqliteStorage {
    fn metadata(&self) -> Result<StoreMetadata> {
        let conn = self.connect()?;

        let created_at_str: String = conn.query_row(
            "SELECT value FROM meta WHERE key = 'created_at'",
            [],
            |row| row.get(0),
        )?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| TodoError::Storage(format!("Invalid created_at timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(StoreMetadata {
            schema_version: schema::user_version(&conn)?,
            created_at,
        })
    }

    fn add_project(&self, project: &Project) -> Result<()> {
        debug!(project_id = %project.id, tasks = project.tasks.len(), "Adding project");
        self.put_project(project)
    }

    fn get_all_projects(&self) -> Result<Vec<Project>> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let mut stmt = tx.prepare("SELECT record_json FROM projects ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        drop(stmt);
        tx.commit()?;

        let projects = rows
            .iter()
            .map(|json| Project::try_from(&StoredProject::from_json(json)?))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = projects.len(), "Loaded projects");
        Ok(projects)
    }

    fn get_project(&self, project_id: &str) -> Result<Option<Project>> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let stored = Self::read_project(&tx, project_id)?;
        tx.commit()?;

        stored.as_ref().map(Project::try_from).transpose()
    }

    fn delete_project(&self, project_id: &str) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM projects WHERE id = ?", [project_id])?;
        tx.commit()?;

        debug!(project_id, removed, "Deleted project");
        Ok(())
    }

    fn update_project(&self, project: &Project) -> Result<()> {
        debug!(project_id = %project.id, tasks = project.tasks.len(), "Updating project");
        self.put_project(project)
    }

    fn add_task_to_project(&self, project_id: &str, task: &Task) -> Result<()> {
        debug!(project_id, task_id = %task.id, "Adding task to project");
        let stored = StoredTask::from(task);
        self.modify_project(project_id, move |project| project.tasks.push(stored))
    }

    fn delete_task_from_project(&self, project_id: &str, task_id: &str) -> Result<()> {
        debug!(project_id, task_id, "Deleting task from project");
        self.modify_project(project_id, |project| {
            let before = project.tasks.len();
            project.tasks.retain(|task| task.id != task_id);
            if project.tasks.len() == before {
                warn!(project_id, task_id, "No top-level task matched for deletion");
            }
        })
    }

    fn add_filters(
        &self,
        project_id: &str,
        status: &[TaskStatus],
        name: &str,
        tag: &[String],
    ) -> Result<()> {
        let record = StoredFilters::singleton(FilterSettings::new(
            project_id,
            status.to_vec(),
            name,
            tag.to_vec(),
        ));
        let json = serde_json::to_string(&record)
            .map_err(|e| TodoError::Storage(format!("Failed to serialize filters: {}", e)))?;

        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT OR REPLACE INTO filters (id, record_json) VALUES (?, ?)",
            (record.id, json),
        )?;
        tx.commit()?;

        debug!(project_id, "Saved filter settings");
        Ok(())
    }

    fn get_filters(&self) -> Result<Option<FilterSettings>> {
        let conn = self.connect()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT record_json FROM filters WHERE id = ?",
                [FILTERS_KEY],
                |row| row.get(0),
            )
            .optional()?;

        json.as_deref()
            .map(|json| StoredFilters::from_json(json).map(|stored| stored.settings))
            .transpose()
    }

    fn get_all_filters(&self) -> Result<Vec<FilterSettings>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT record_json FROM filters ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|json| StoredFilters::from_json(json).map(|stored| stored.settings))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> SqliteStorage {
        SqliteStorage::open(StoreConfig::new(dir.path().join("todo.db"))).unwrap()
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("todo.db");

        SqliteStorage::open(StoreConfig::new(&path)).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_metadata_reports_schema_version() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let metadata = storage.metadata().unwrap();
        assert_eq!(metadata.schema_version, SCHEMA_VERSION);
        assert!(metadata.created_at <= Utc::now());
    }

    #[test]
    fn test_get_project_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        assert!(storage.get_project("nope").unwrap().is_none());
    }

    #[test]
    fn test_task_mutation_leaves_other_records_raw() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        // A record written by an older client with millisecond timestamps.
        let conn = Connection::open(dir.path().join("todo.db")).unwrap();
        conn.execute(
            "INSERT INTO projects (id, record_json) VALUES ('p1', ?)",
            [r#"{"id":"p1","name":"Legacy","tasks":[{"id":"t1","title":"Old","status":"done",
                "createdAt":1700000000000,"updatedAt":1700000000000}]}"#],
        )
        .unwrap();

        storage
            .add_task_to_project("p1", &Task::new("New").with_id("t2"))
            .unwrap();

        let json: String = conn
            .query_row("SELECT record_json FROM projects WHERE id = 'p1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert!(json.contains("1700000000000"));

        let project = storage.get_project("p1").unwrap().unwrap();
        assert_eq!(project.tasks.len(), 2);
        assert_eq!(project.tasks[0].created_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_fractional_millis_record_loads() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let conn = Connection::open(dir.path().join("todo.db")).unwrap();
        conn.execute(
            "INSERT INTO projects (id, record_json) VALUES ('p1', ?)",
            [r#"{"id":"p1","name":"Float","tasks":[{"id":"t1","title":"x","status":"todo",
                "createdAt":1700000000000.0,"updatedAt":1700000000000.5}]}"#],
        )
        .unwrap();

        let projects = storage.get_all_projects().unwrap();
        assert_eq!(
            projects[0].tasks[0].updated_at.timestamp_millis(),
            1_700_000_000_000
        );
    }

    #[test]
    fn test_task_mutation_keeps_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let conn = Connection::open(dir.path().join("todo.db")).unwrap();
        conn.execute(
            "INSERT INTO projects (id, record_json) VALUES ('p1', ?)",
            [r#"{"id":"p1","name":"X","color":"red","tasks":[]}"#],
        )
        .unwrap();

        storage
            .add_task_to_project("p1", &Task::new("Paint").with_id("t1"))
            .unwrap();
        storage.delete_task_from_project("p1", "missing").unwrap();

        let json: String = conn
            .query_row("SELECT record_json FROM projects WHERE id = 'p1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["color"], "red");
        assert_eq!(value["tasks"][0]["id"], "t1");
    }

    #[test]
    fn test_corrupt_record_surfaces_storage_error() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let conn = Connection::open(dir.path().join("todo.db")).unwrap();
        conn.execute(
            "INSERT INTO projects (id, record_json) VALUES ('p1', 'not json')",
            [],
        )
        .unwrap();

        assert!(matches!(
            storage.get_all_projects(),
            Err(TodoError::Storage(_))
        ));
    }
}
