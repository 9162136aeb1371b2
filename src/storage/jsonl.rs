//! JSONL storage for tasks
//!
//! Tasks are stored in `.tether/tasks.jsonl` with one JSON object per line.
//! File order is creation order and is preserved across rewrites; the graph
//! queries derive their output order from it. Uses file locking for
//! concurrent access safety.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::{Task, TaskId};

/// Store for task data in JSONL format
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a new task store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".tether").join("tasks.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all tasks from the store, in file order
    pub fn read_all(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open task store: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on task store")?;

        let reader = BufReader::new(&file);
        let mut tasks = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let task: Task = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse task at line {}", line_num + 1))?;

            tasks.push(task);
        }

        // Lock is released when file is dropped
        Ok(tasks)
    }

    /// Reads a single task by ID
    pub fn find(&self, task_id: &TaskId) -> Result<Option<Task>> {
        Ok(self.read_all()?.into_iter().find(|t| &t.id == task_id))
    }

    /// Writes all tasks to the store in the given order (full rewrite)
    pub fn write_all(&self, tasks: &[Task]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on task store")?;

            let mut writer = BufWriter::new(&file);

            for task in tasks {
                let line = serde_json::to_string(task).context("Failed to serialize task")?;
                writeln!(writer, "{}", line).context("Failed to write task")?;
            }

            writer.flush().context("Failed to flush task store")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Appends a single task (used for adds without full rewrite)
    pub fn append(&self, task: &Task) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open task store: {}", self.path.display()))?;

        // Acquire exclusive lock
        file.lock_exclusive()
            .context("Failed to acquire write lock on task store")?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(task).context("Failed to serialize task")?;
        writeln!(writer, "{}", line).context("Failed to write task")?;

        writer.flush().context("Failed to flush task store")?;

        Ok(())
    }

    /// Updates a single task in place, preserving its position in the file
    pub fn update(&self, task: &Task) -> Result<()> {
        let mut tasks = self.read_all()?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
        self.write_all(&tasks)
    }

    /// Removes a task by ID
    pub fn remove(&self, task_id: &TaskId) -> Result<bool> {
        let mut tasks = self.read_all()?;
        let len_before = tasks.len();
        tasks.retain(|t| &t.id != task_id);

        let removed = tasks.len() != len_before;
        if removed {
            self.write_all(&tasks)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn make_task(title: &str) -> Task {
        let task_id = TaskId::new(title, Utc::now());
        Task::new(task_id, title)
    }

    #[test]
    fn read_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let tasks = store.read_all().unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn write_and_read_tasks() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let task1 = make_task("Task 1");
        let task2 = make_task("Task 2");

        store.write_all(&[task1.clone(), task2.clone()]).unwrap();

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title, task1.title);
        assert_eq!(loaded[1].title, task2.title);
    }

    #[test]
    fn append_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let task1 = make_task("Task 1");
        let task2 = make_task("Task 2");
        let task3 = make_task("Task 3");

        store.append(&task1).unwrap();
        store.append(&task2).unwrap();
        store.append(&task3).unwrap();

        let loaded = store.read_all().unwrap();
        let ids: Vec<_> = loaded.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![task1.id, task2.id, task3.id]);
    }

    #[test]
    fn update_keeps_position() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let mut task1 = make_task("Task 1");
        let task2 = make_task("Task 2");
        store.append(&task1).unwrap();
        store.append(&task2).unwrap();

        task1.start();
        store.update(&task1).unwrap();

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded[0].id, task1.id);
        assert_eq!(loaded[0].status, crate::domain::TaskStatus::InProgress);
        assert_eq!(loaded[1].id, task2.id);
    }

    #[test]
    fn find_task() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let task = make_task("Task 1");
        store.append(&task).unwrap();

        assert_eq!(store.find(&task.id).unwrap().unwrap().title, task.title);

        let other = make_task("Other");
        assert!(store.find(&other.id).unwrap().is_none());
    }

    #[test]
    fn remove_task() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let task1 = make_task("Task 1");
        let task2 = make_task("Task 2");
        store.append(&task1).unwrap();
        store.append(&task2).unwrap();

        let removed = store.remove(&task1.id).unwrap();
        assert!(removed);

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, task2.id);
    }

    #[test]
    fn remove_missing_task_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let task = make_task("Task 1");
        store.append(&task).unwrap();

        let other = make_task("Other");
        assert!(!store.remove(&other.id).unwrap());
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("nested").join("dir").join("tasks.jsonl"));

        let task = make_task("Task 1");
        store.append(&task).unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn atomic_write() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let task = make_task("Task 1");
        store.write_all(&[task]).unwrap();

        // Temp file should not exist after write
        let temp_path = store.path().with_extension("jsonl.tmp");
        assert!(!temp_path.exists());
    }
}
