//! JSONL storage for dependency edges
//!
//! Edges are stored in `.tether/deps.jsonl`, one JSON object per line, in
//! insertion order. The graph engine depends on that order for deterministic
//! tie-breaking, so rewrites preserve it. Same locking and atomic-write
//! discipline as the task store.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::{DependencyEdge, TaskId};

/// Store for dependency edges in JSONL format
pub struct EdgeStore {
    path: PathBuf,
}

impl EdgeStore {
    /// Creates a new edge store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".tether").join("deps.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all edges from the store, in insertion order
    pub fn read_all(&self) -> Result<Vec<DependencyEdge>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open edge store: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on edge store")?;

        let reader = BufReader::new(&file);
        let mut edges = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let edge: DependencyEdge = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse edge at line {}", line_num + 1))?;

            edges.push(edge);
        }

        Ok(edges)
    }

    /// Writes all edges to the store in the given order (full rewrite)
    pub fn write_all(&self, edges: &[DependencyEdge]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on edge store")?;

            let mut writer = BufWriter::new(&file);

            for edge in edges {
                let line = serde_json::to_string(edge).context("Failed to serialize edge")?;
                writeln!(writer, "{}", line).context("Failed to write edge")?;
            }

            writer.flush().context("Failed to flush edge store")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Appends a single edge
    pub fn append(&self, edge: &DependencyEdge) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open edge store: {}", self.path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on edge store")?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(edge).context("Failed to serialize edge")?;
        writeln!(writer, "{}", line).context("Failed to write edge")?;

        writer.flush().context("Failed to flush edge store")?;

        Ok(())
    }

    /// Returns true if an edge between the given endpoints already exists
    pub fn exists(&self, task: &TaskId, depends_on: &TaskId) -> Result<bool> {
        Ok(self
            .read_all()?
            .iter()
            .any(|e| &e.task == task && &e.depends_on == depends_on))
    }

    /// Removes the edge between the given endpoints
    pub fn remove_between(&self, task: &TaskId, depends_on: &TaskId) -> Result<bool> {
        let mut edges = self.read_all()?;
        let len_before = edges.len();
        edges.retain(|e| !(&e.task == task && &e.depends_on == depends_on));

        let removed = edges.len() != len_before;
        if removed {
            self.write_all(&edges)?;
        }
        Ok(removed)
    }

    /// Removes every edge touching the given task (used when a task is deleted)
    pub fn remove_touching(&self, task_id: &TaskId) -> Result<usize> {
        let mut edges = self.read_all()?;
        let len_before = edges.len();
        edges.retain(|e| !e.touches(task_id));

        let removed = len_before - edges.len();
        if removed > 0 {
            self.write_all(&edges)?;
        }
        Ok(removed)
    }
}
