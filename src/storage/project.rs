//! Project management
//!
//! Handles project initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, EdgeStore, TaskStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a tether project. Run 'tether init' first.")]
    NotInProject,
}

/// A Tether project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let tether_dir = root.join(".tether");

        if !tether_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path (idempotent)
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let tether_dir = root.join(".tether");

        fs::create_dir_all(&tether_dir).with_context(|| {
            format!(
                "Failed to create .tether directory: {}",
                tether_dir.display()
            )
        })?;

        // Create default config
        let config_path = tether_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Tether configuration

# Horizon in days for the "soon" bucket of the timeline view
timeline_days = 7
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        // Create .gitignore for .tether
        let gitignore_path = tether_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# In-flight atomic writes
*.tmp
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .tether directory path
    pub fn tether_dir(&self) -> PathBuf {
        self.root.join(".tether")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the task store
    pub fn task_store(&self) -> TaskStore {
        TaskStore::for_project(&self.root)
    }

    /// Returns the edge store
    pub fn edge_store(&self) -> EdgeStore {
        EdgeStore::for_project(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.tether_dir().is_dir());
        assert!(project.tether_dir().join("config.toml").is_file());
        assert!(project.tether_dir().join(".gitignore").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        Project::init(dir.path()).unwrap();
    }

    #[test]
    fn open_requires_tether_dir() {
        let dir = TempDir::new().unwrap();

        assert!(Project::open(dir.path()).is_err());
    }

    #[test]
    fn stores_live_under_tether_dir() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.task_store().path().starts_with(project.tether_dir()));
        assert!(project.edge_store().path().starts_with(project.tether_dir()));
    }
}
