//! Task CLI commands

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Subcommand;

use super::output::Output;
use crate::domain::{blockers, Task, TaskId, TaskStatus};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Deadline (YYYY-MM-DD), shown in the timeline view
        #[arg(long)]
        deadline: Option<String>,

        /// Description
        #[arg(long)]
        description: Option<String>,
    },

    /// List tasks
    List {
        /// Filter by status (todo, in_progress, done)
        #[arg(long)]
        status: Option<String>,
    },

    /// Show task details
    Show {
        /// Task ID
        id: String,
    },

    /// Mark task as in progress
    Start {
        /// Task ID
        id: String,
    },

    /// Mark task as done
    Done {
        /// Task ID
        id: String,
    },

    /// Reopen a completed task
    Reopen {
        /// Task ID
        id: String,
    },

    /// Remove a task (and every dependency edge touching it)
    Rm {
        /// Task ID
        id: String,
    },
}

pub fn run(cmd: TaskCommands, output: &Output) -> Result<()> {
    match cmd {
        TaskCommands::Add {
            title,
            deadline,
            description,
        } => add_task(output, &title, deadline.as_deref(), description.as_deref()),
        TaskCommands::List { status } => list_tasks(output, status.as_deref()),
        TaskCommands::Show { id } => show_task(output, &id),
        TaskCommands::Start { id } => transition(output, &id, Task::start, "Started"),
        TaskCommands::Done { id } => transition(output, &id, Task::complete, "Completed"),
        TaskCommands::Reopen { id } => transition(output, &id, Task::reopen, "Reopened"),
        TaskCommands::Rm { id } => remove_task(output, &id),
    }
}

fn parse_deadline(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid deadline (expected YYYY-MM-DD): {}", s))
}

fn parse_status(s: &str) -> Result<TaskStatus> {
    match s {
        "todo" => Ok(TaskStatus::Todo),
        "in_progress" => Ok(TaskStatus::InProgress),
        "done" => Ok(TaskStatus::Done),
        other => anyhow::bail!("Unknown status: {} (expected todo, in_progress, done)", other),
    }
}

fn add_task(
    output: &Output,
    title: &str,
    deadline_str: Option<&str>,
    description: Option<&str>,
) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();

    let mut task = Task::new(TaskId::new(title, Utc::now()), title);
    if let Some(s) = deadline_str {
        task.set_deadline(Some(parse_deadline(s)?));
    }
    if let Some(desc) = description {
        task.set_description(desc);
    }

    store.append(&task)?;
    output.verbose_ctx("task", &format!("Appended task to {}", store.path().display()));

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id.to_string(),
            "title": task.title,
            "status": task.status,
            "deadline": task.deadline,
        }));
    } else {
        output.success(&format!("Created task: {} - {}", task.id, task.title));
    }

    Ok(())
}

fn list_tasks(output: &Output, status_filter: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;

    let filter = status_filter.map(parse_status).transpose()?;
    let tasks: Vec<_> = tasks
        .into_iter()
        .filter(|t| filter.map(|f| t.status == f).unwrap_or(true))
        .collect();

    if output.is_json() {
        let items: Vec<_> = tasks
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id.to_string(),
                    "title": t.title,
                    "status": t.status,
                    "deadline": t.deadline,
                })
            })
            .collect();
        output.data(&items);
    } else if tasks.is_empty() {
        println!("No tasks");
    } else {
        println!("{:<12} {:<12} {:<12} TITLE", "ID", "STATUS", "DEADLINE");
        println!("{}", "-".repeat(60));

        for task in &tasks {
            let deadline = task
                .deadline
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<12} {:<12} {:<12} {}",
                task.id.to_string(),
                task.status.label(),
                deadline,
                task.title
            );
        }
    }

    Ok(())
}

fn show_task(output: &Output, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;
    let edges = project.edge_store().read_all()?;

    let id: TaskId = id_str.parse()?;
    let task = tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))?;

    let blocked_by = blockers(&id, &tasks, &edges);
    let prerequisites: Vec<_> = edges
        .iter()
        .filter(|e| e.task == id)
        .map(|e| e.depends_on.clone())
        .collect();

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id.to_string(),
            "title": task.title,
            "status": task.status,
            "deadline": task.deadline,
            "description": task.description,
            "created_at": task.created_at,
            "updated_at": task.updated_at,
            "completed_at": task.completed_at,
            "depends_on": prerequisites.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            "blocked_by": blocked_by.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
        }));
    } else {
        println!("Task: {}", task.id);
        println!("Title: {}", task.title);
        println!("Status: {}", task.status.label());
        if let Some(deadline) = task.deadline {
            println!("Deadline: {}", deadline);
        }
        println!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M"));
        println!("Updated: {}", task.updated_at.format("%Y-%m-%d %H:%M"));
        if let Some(completed) = task.completed_at {
            println!("Completed: {}", completed.format("%Y-%m-%d %H:%M"));
        }

        if let Some(desc) = &task.description {
            println!("\nDescription:");
            println!("{}", desc);
        }

        if !prerequisites.is_empty() {
            println!("\nDepends on:");
            for dep in &prerequisites {
                let done = !blocked_by.contains(dep);
                let mark = if done { "x" } else { " " };
                println!("  [{}] {}", mark, dep);
            }
        }

        if task.status.is_pending() && !prerequisites.is_empty() {
            println!();
            if blocked_by.is_empty() {
                println!("READY (all prerequisites complete)");
            } else {
                println!("BLOCKED (waiting on {} prerequisite(s))", blocked_by.len());
            }
        }
    }

    Ok(())
}

fn transition(
    output: &Output,
    id_str: &str,
    apply: impl Fn(&mut Task),
    verb: &str,
) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();

    let id: TaskId = id_str.parse()?;
    let mut task = store
        .find(&id)?
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))?;

    apply(&mut task);
    store.update(&task)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id.to_string(),
            "status": task.status,
            "completed_at": task.completed_at,
        }));
    } else {
        output.success(&format!("{} task: {}", verb, task.id));
    }

    Ok(())
}

fn remove_task(output: &Output, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();
    let edge_store = project.edge_store();

    let id: TaskId = id_str.parse()?;
    if !store.remove(&id)? {
        anyhow::bail!("Task not found: {}", id);
    }

    // The host owns edge lifecycle: deleting a task cascades to its edges.
    let removed_edges = edge_store.remove_touching(&id)?;
    output.verbose_ctx("task", &format!("Removed {} edge(s)", removed_edges));

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": id.to_string(),
            "removed_edges": removed_edges,
        }));
    } else {
        output.success(&format!(
            "Removed task {} ({} edge(s) dropped)",
            id, removed_edges
        ));
    }

    Ok(())
}
