//! Store configuration.
//!
//! Read from a TOML file of the form:
//!
//! ```toml
//! [database]
//! path = "/home/me/.local/share/todo/todo.db"
//! busy_timeout_ms = 5000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TodoError};

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub database: DatabaseSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub path: PathBuf,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseSection {
                path: path.into(),
                busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            },
        }
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.database.busy_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| TodoError::Config(format!("Invalid config: {}", e)))
    }

    pub fn path(&self) -> &Path {
        &self.database.path
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.database.busy_timeout_ms)
    }
}

pub fn read_config(path: &Path) -> Result<StoreConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        TodoError::Config(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    toml::from_str(&contents).map_err(|e| {
        TodoError::Config(format!("Failed to parse config {}: {}", path.display(), e))
    })
}

pub fn write_config(path: &Path, config: &StoreConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            TodoError::Config(format!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    let contents = toml::to_string_pretty(config)
        .map_err(|e| TodoError::Config(format!("TOML error: {}", e)))?;
    std::fs::write(path, contents).map_err(|e| {
        TodoError::Config(format!("Failed to write config {}: {}", path.display(), e))
    })?;
    Ok(())
}

/// `$XDG_DATA_HOME/todo/todo.db`, falling back to `~/.local/share/todo/todo.db`.
pub fn default_database_path() -> Result<PathBuf> {
    Ok(xdg_data_dir()?.join("todo.db"))
}

fn xdg_data_dir() -> Result<PathBuf> {
    data_dir_from(std::env::var("XDG_DATA_HOME").ok(), std::env::var("HOME").ok())
}

fn data_dir_from(xdg_data_home: Option<String>, home: Option<String>) -> Result<PathBuf> {
    if let Some(value) = xdg_data_home {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("todo"));
        }
    }
    let home = home.ok_or_else(|| {
        TodoError::Config("HOME is not set; cannot resolve default paths".to_string())
    })?;
    Ok(PathBuf::from(home).join(".local").join("share").join("todo"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_uses_default_timeout() {
        let config = StoreConfig::from_toml_str(
            r#"
            [database]
            path = "/tmp/todo.db"
            "#,
        )
        .unwrap();
        assert_eq!(config.path(), Path::new("/tmp/todo.db"));
        assert_eq!(config.busy_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_parse_rejects_missing_section() {
        let result = StoreConfig::from_toml_str("path = \"/tmp/todo.db\"");
        assert!(matches!(result, Err(TodoError::Config(_))));
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");
        let config = StoreConfig::new(dir.path().join("todo.db"))
            .with_busy_timeout(Duration::from_millis(250));

        write_config(&config_path, &config).unwrap();
        let loaded = read_config(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_data_dir_prefers_xdg() {
        let dir = data_dir_from(Some("/xdg/data".to_string()), Some("/home/me".to_string()))
            .unwrap();
        assert_eq!(dir, PathBuf::from("/xdg/data/todo"));
    }

    #[test]
    fn test_data_dir_falls_back_to_home() {
        let blank = data_dir_from(Some("  ".to_string()), Some("/home/me".to_string())).unwrap();
        let unset = data_dir_from(None, Some("/home/me".to_string())).unwrap();

        assert_eq!(blank, PathBuf::from("/home/me/.local/share/todo"));
        assert_eq!(unset, blank);
    }

    #[test]
    fn test_data_dir_without_home_fails() {
        let result = data_dir_from(None, None);
        assert!(matches!(result, Err(TodoError::Config(_))));
    }

    #[test]
    fn test_default_database_path_file_name() {
        if std::env::var("XDG_DATA_HOME").is_err() && std::env::var("HOME").is_err() {
            return;
        }
        let path = default_database_path().unwrap();
        assert!(path.ends_with("todo/todo.db"));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = read_config(&dir.path().join("absent.toml"));
        assert!(result.unwrap_err().to_string().contains("Failed to read config"));
    }
}
