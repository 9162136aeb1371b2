//! Query commands (ready, blocked, path, status, timeline, check)
//!
//! Pure derived views: each command reloads the stores and re-runs the
//! graph engine, so output always reflects the current state on disk.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{Duration, Utc};

use super::output::Output;
use crate::domain::{
    blockers, classify_tasks, contains_cycle, critical_path, dangling_edges, Task, TaskId,
    TaskStatus,
};
use crate::storage::Project;

/// Show tasks ready to work on
pub fn ready(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;
    let edges = project.edge_store().read_all()?;

    let classification = classify_tasks(&tasks, &edges);
    output.verbose_ctx(
        "ready",
        &format!("Found {} ready tasks", classification.ready.len()),
    );

    let by_id: HashMap<&TaskId, &Task> = tasks.iter().map(|t| (&t.id, t)).collect();

    if output.is_json() {
        let items: Vec<_> = classification
            .ready
            .iter()
            .filter_map(|id| by_id.get(id))
            .map(|t| {
                serde_json::json!({
                    "id": t.id.to_string(),
                    "title": t.title,
                })
            })
            .collect();
        output.data(&items);
    } else if classification.ready.is_empty() {
        println!("No tasks ready to work on.");
    } else {
        println!("Ready tasks ({}):", classification.ready.len());
        println!("{:<12} TITLE", "ID");
        println!("{}", "-".repeat(50));
        for id in &classification.ready {
            if let Some(task) = by_id.get(id) {
                println!("{:<12} {}", task.id.to_string(), task.title);
            }
        }
    }

    Ok(())
}

/// Show blocked tasks
pub fn blocked(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;
    let edges = project.edge_store().read_all()?;

    let classification = classify_tasks(&tasks, &edges);
    output.verbose_ctx(
        "blocked",
        &format!("Found {} blocked tasks", classification.blocked.len()),
    );

    let by_id: HashMap<&TaskId, &Task> = tasks.iter().map(|t| (&t.id, t)).collect();

    if output.is_json() {
        let items: Vec<_> = classification
            .blocked
            .iter()
            .filter_map(|id| by_id.get(id))
            .map(|t| {
                serde_json::json!({
                    "id": t.id.to_string(),
                    "title": t.title,
                    "blocked_by": blockers(&t.id, &tasks, &edges)
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        output.data(&items);
    } else if classification.blocked.is_empty() {
        println!("No blocked tasks.");
    } else {
        println!("Blocked tasks ({}):", classification.blocked.len());
        println!("{:<12} {:<30} BLOCKED BY", "ID", "TITLE");
        println!("{}", "-".repeat(70));
        for id in &classification.blocked {
            if let Some(task) = by_id.get(id) {
                let blocked_by: Vec<_> = blockers(id, &tasks, &edges)
                    .iter()
                    .map(|d| d.to_string())
                    .collect();
                println!(
                    "{:<12} {:<30} {}",
                    task.id.to_string(),
                    task.title,
                    blocked_by.join(", ")
                );
            }
        }
    }

    Ok(())
}

/// Show the critical path (longest dependency chain)
pub fn path(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;
    let edges = project.edge_store().read_all()?;

    let path = critical_path(&tasks, &edges);
    output.verbose_ctx("path", &format!("Critical path has {} tasks", path.len()));

    if output.is_json() {
        let items: Vec<_> = path
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id.to_string(),
                    "title": t.title,
                    "status": t.status,
                })
            })
            .collect();
        output.data(&items);
    } else if path.is_empty() {
        println!("No dependency chains.");
    } else {
        println!("Critical path ({} tasks):", path.len());
        for (i, task) in path.iter().enumerate() {
            let mark = if task.is_complete() { "x" } else { " " };
            println!("{:>3}. [{}] {} - {}", i + 1, mark, task.id, task.title);
        }
    }

    Ok(())
}

/// Show project status overview
pub fn status(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;
    let edges = project.edge_store().read_all()?;

    let todo = tasks.iter().filter(|t| t.status == TaskStatus::Todo).count();
    let in_progress = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::InProgress)
        .count();
    let done = tasks.iter().filter(|t| t.status == TaskStatus::Done).count();

    let classification = classify_tasks(&tasks, &edges);
    let chain = critical_path(&tasks, &edges);

    if output.is_json() {
        output.data(&serde_json::json!({
            "tasks": {
                "total": tasks.len(),
                "todo": todo,
                "in_progress": in_progress,
                "done": done,
                "ready": classification.ready.len(),
                "blocked": classification.blocked.len(),
            },
            "edges": edges.len(),
            "critical_path_length": chain.len(),
        }));
    } else {
        println!("Project Status");
        println!("{}", "=".repeat(40));
        println!();
        println!("Tasks: {} total", tasks.len());
        println!("  [ ] Todo:        {}", todo);
        println!("  [~] In Progress: {}", in_progress);
        println!("  [x] Done:        {}", done);
        println!();
        println!("  Ready to work:   {}", classification.ready.len());
        println!("  Blocked:         {}", classification.blocked.len());
        println!();
        println!("Dependencies: {} edge(s)", edges.len());
        println!("Critical path: {} task(s)", chain.len());
    }

    Ok(())
}

/// Timeline view: pending tasks bucketed by deadline
pub fn timeline(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;
    let horizon_days = project.config().project.timeline_days;

    let today = Utc::now().date_naive();
    let horizon = today + Duration::days(i64::from(horizon_days));

    let mut overdue = Vec::new();
    let mut due_today = Vec::new();
    let mut soon = Vec::new();
    let mut later = Vec::new();
    let mut unscheduled = Vec::new();

    for task in tasks.iter().filter(|t| t.status.is_pending()) {
        match task.deadline {
            Some(d) if d < today => overdue.push(task),
            Some(d) if d == today => due_today.push(task),
            Some(d) if d <= horizon => soon.push(task),
            Some(_) => later.push(task),
            None => unscheduled.push(task),
        }
    }

    let to_json = |bucket: &[&Task]| -> Vec<serde_json::Value> {
        bucket
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id.to_string(),
                    "title": t.title,
                    "deadline": t.deadline,
                })
            })
            .collect()
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "overdue": to_json(&overdue),
            "today": to_json(&due_today),
            "soon": to_json(&soon),
            "later": to_json(&later),
            "unscheduled": to_json(&unscheduled),
        }));
    } else {
        let print_bucket = |label: &str, bucket: &[&Task]| {
            if bucket.is_empty() {
                return;
            }
            println!("{}:", label);
            for task in bucket {
                let deadline = task
                    .deadline
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("  {:<12} {:<12} {}", task.id.to_string(), deadline, task.title);
            }
            println!();
        };

        if overdue.is_empty()
            && due_today.is_empty()
            && soon.is_empty()
            && later.is_empty()
            && unscheduled.is_empty()
        {
            println!("No pending tasks.");
        } else {
            print_bucket("Overdue", &overdue);
            print_bucket("Today", &due_today);
            print_bucket(&format!("Next {} days", horizon_days), &soon);
            print_bucket("Later", &later);
            print_bucket("No deadline", &unscheduled);
        }
    }

    Ok(())
}

/// Integrity check over the whole dependency store.
///
/// Edges normally pass the cycle check one at a time on insertion; anything
/// that bypassed it (bulk import, hand-edited store files) is caught here.
pub fn check(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;
    let edges = project.edge_store().read_all()?;

    let has_cycle = contains_cycle(&edges);
    let dangling = dangling_edges(&tasks, &edges);

    if output.is_json() {
        output.data(&serde_json::json!({
            "edges": edges.len(),
            "cycle": has_cycle,
            "dangling": dangling
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "id": e.id.to_string(),
                        "task": e.task.to_string(),
                        "depends_on": e.depends_on.to_string(),
                    })
                })
                .collect::<Vec<_>>(),
        }));
    } else {
        println!("Checked {} edge(s)", edges.len());

        if !dangling.is_empty() {
            println!();
            println!("Dangling edges (referencing missing tasks):");
            for edge in &dangling {
                println!("  {} {} -> {}", edge.id, edge.task, edge.depends_on);
            }
        }

        if has_cycle {
            println!();
            println!("Dependency store contains a cycle.");
        } else if dangling.is_empty() {
            println!("No problems found.");
        }
    }

    if has_cycle {
        anyhow::bail!("Dependency store contains a cycle");
    }

    Ok(())
}
