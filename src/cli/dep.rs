//! Dependency CLI commands
//!
//! The graph engine only answers the cycle question; the rejection message
//! and exit code live here.

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{would_create_cycle, DependencyEdge, TaskId};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum DepCommands {
    /// Add a dependency: TASK cannot start until DEPENDS_ON is done
    Add {
        /// Task that will be blocked
        task: String,

        /// Task that must be completed first
        depends_on: String,
    },

    /// Remove a dependency
    Rm {
        /// Task to unblock
        task: String,

        /// Dependency to remove
        depends_on: String,
    },

    /// List dependency edges (all, or for one task)
    List {
        /// Task ID
        task: Option<String>,
    },
}

pub fn run(cmd: DepCommands, output: &Output) -> Result<()> {
    match cmd {
        DepCommands::Add { task, depends_on } => add(output, &task, &depends_on),
        DepCommands::Rm { task, depends_on } => remove(output, &task, &depends_on),
        DepCommands::List { task } => list(output, task.as_deref()),
    }
}

fn add(output: &Output, task_str: &str, depends_on_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let task_store = project.task_store();
    let edge_store = project.edge_store();

    let task_id: TaskId = task_str.parse()?;
    let depends_on_id: TaskId = depends_on_str.parse()?;

    let tasks = task_store.read_all()?;
    if !tasks.iter().any(|t| t.id == task_id) {
        anyhow::bail!("Task not found: {}", task_id);
    }
    if !tasks.iter().any(|t| t.id == depends_on_id) {
        anyhow::bail!("Dependency task not found: {}", depends_on_id);
    }

    if edge_store.exists(&task_id, &depends_on_id)? {
        anyhow::bail!("{} already depends on {}", task_id, depends_on_id);
    }

    let edges = edge_store.read_all()?;
    if would_create_cycle(&task_id, &depends_on_id, &edges) {
        anyhow::bail!(
            "Cannot add dependency: {} -> {} would create a cycle",
            task_id,
            depends_on_id
        );
    }

    let edge = DependencyEdge::new(task_id.clone(), depends_on_id.clone())?;
    edge_store.append(&edge)?;
    output.verbose_ctx("dep", &format!("Appended edge {}", edge.id));

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": edge.id.to_string(),
            "task": task_id.to_string(),
            "depends_on": depends_on_id.to_string(),
        }));
    } else {
        output.success(&format!("{} now depends on {}", task_id, depends_on_id));
    }

    Ok(())
}

fn remove(output: &Output, task_str: &str, depends_on_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let edge_store = project.edge_store();

    let task_id: TaskId = task_str.parse()?;
    let depends_on_id: TaskId = depends_on_str.parse()?;

    if !edge_store.remove_between(&task_id, &depends_on_id)? {
        anyhow::bail!("No dependency from {} on {}", task_id, depends_on_id);
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "task": task_id.to_string(),
            "removed_dependency": depends_on_id.to_string(),
        }));
    } else {
        output.success(&format!(
            "Removed dependency: {} no longer depends on {}",
            task_id, depends_on_id
        ));
    }

    Ok(())
}

fn list(output: &Output, task_str: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;
    let edges = project.edge_store().read_all()?;

    let filter: Option<TaskId> = task_str.map(str::parse).transpose()?;
    let edges: Vec<_> = edges
        .into_iter()
        .filter(|e| filter.as_ref().map(|id| e.touches(id)).unwrap_or(true))
        .collect();

    if output.is_json() {
        let items: Vec<_> = edges
            .iter()
            .map(|e| {
                serde_json::json!({
                    "id": e.id.to_string(),
                    "task": e.task.to_string(),
                    "depends_on": e.depends_on.to_string(),
                })
            })
            .collect();
        output.data(&items);
    } else if edges.is_empty() {
        println!("No dependencies");
    } else {
        println!("{:<12} {:<12} DEPENDS ON", "ID", "TASK");
        println!("{}", "-".repeat(40));
        for edge in &edges {
            println!(
                "{:<12} {:<12} {}",
                edge.id.to_string(),
                edge.task.to_string(),
                edge.depends_on
            );
        }
    }

    Ok(())
}
