//! CLI integration tests for Tether
//!
//! These tests verify the complete workflow from initialization through
//! task and dependency management, ensuring commands work together
//! correctly.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command instance for the tether binary
fn tether_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("tether"))
}

/// Create a temporary directory and initialize a tether project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    tether_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

/// Add a task and return its ID
fn add_task(dir: &TempDir, title: &str) -> String {
    let output = tether_cmd()
        .current_dir(dir.path())
        .args(["task", "add", title, "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    json["id"].as_str().unwrap().to_string()
}

/// Add a dependency edge between two tasks
fn add_dep(dir: &TempDir, task: &str, depends_on: &str) {
    tether_cmd()
        .current_dir(dir.path())
        .args(["dep", "add", task, depends_on])
        .assert()
        .success();
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    tether_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tether project"));

    assert!(dir.path().join(".tether").is_dir());
    assert!(dir.path().join(".tether/config.toml").is_file());
    assert!(dir.path().join(".tether/.gitignore").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    tether_cmd().arg("init").arg(dir.path()).assert().success();
    tether_cmd().arg("init").arg(dir.path()).assert().success();
}

#[test]
fn test_commands_fail_outside_project() {
    let dir = TempDir::new().unwrap();

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a tether project"));
}

// =============================================================================
// Task Tests
// =============================================================================

#[test]
fn test_task_add_and_list() {
    let dir = setup_project();

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "My First Task"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task"));

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("My First Task"));
}

#[test]
fn test_task_add_with_deadline() {
    let dir = setup_project();

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Deadlined", "--deadline", "2030-06-01"])
        .assert()
        .success();

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2030-06-01"));
}

#[test]
fn test_task_add_rejects_bad_deadline() {
    let dir = setup_project();

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Bad", "--deadline", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid deadline"));
}

#[test]
fn test_task_lifecycle() {
    let dir = setup_project();
    let id = add_task(&dir, "Lifecycle");

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "start", &id])
        .assert()
        .success();

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &id])
        .assert()
        .success();

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "list", "--status", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lifecycle"));

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "reopen", &id])
        .assert()
        .success();

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "list", "--status", "todo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lifecycle"));
}

#[test]
fn test_task_show_unknown_fails() {
    let dir = setup_project();

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "show", "t-0000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));
}

#[test]
fn test_task_rm_cascades_edges() {
    let dir = setup_project();
    let a = add_task(&dir, "A");
    let b = add_task(&dir, "B");
    add_dep(&dir, &b, &a);

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "rm", &a])
        .assert()
        .success();

    tether_cmd()
        .current_dir(dir.path())
        .args(["dep", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No dependencies"));
}

// =============================================================================
// Dependency Tests
// =============================================================================

#[test]
fn test_dep_add_and_list() {
    let dir = setup_project();
    let a = add_task(&dir, "A");
    let b = add_task(&dir, "B");

    tether_cmd()
        .current_dir(dir.path())
        .args(["dep", "add", &b, &a])
        .assert()
        .success()
        .stdout(predicate::str::contains("now depends on"));

    tether_cmd()
        .current_dir(dir.path())
        .args(["dep", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&b));
}

#[test]
fn test_dep_add_rejects_unknown_task() {
    let dir = setup_project();
    let a = add_task(&dir, "A");

    tether_cmd()
        .current_dir(dir.path())
        .args(["dep", "add", &a, "t-0000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_dep_add_rejects_self_loop() {
    let dir = setup_project();
    let a = add_task(&dir, "A");

    tether_cmd()
        .current_dir(dir.path())
        .args(["dep", "add", &a, &a])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle"));
}

#[test]
fn test_dep_add_rejects_duplicate() {
    let dir = setup_project();
    let a = add_task(&dir, "A");
    let b = add_task(&dir, "B");
    add_dep(&dir, &b, &a);

    tether_cmd()
        .current_dir(dir.path())
        .args(["dep", "add", &b, &a])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already depends on"));
}

#[test]
fn test_dep_add_rejects_cycle() {
    let dir = setup_project();
    let a = add_task(&dir, "A");
    let b = add_task(&dir, "B");
    let c = add_task(&dir, "C");

    // A depends on B, B depends on C
    add_dep(&dir, &a, &b);
    add_dep(&dir, &b, &c);

    // C depending on A would close the loop
    tether_cmd()
        .current_dir(dir.path())
        .args(["dep", "add", &c, &a])
        .assert()
        .failure()
        .stderr(predicate::str::contains("would create a cycle"));
}

#[test]
fn test_dep_rm() {
    let dir = setup_project();
    let a = add_task(&dir, "A");
    let b = add_task(&dir, "B");
    add_dep(&dir, &b, &a);

    tether_cmd()
        .current_dir(dir.path())
        .args(["dep", "rm", &b, &a])
        .assert()
        .success()
        .stdout(predicate::str::contains("no longer depends on"));

    // Removing again fails
    tether_cmd()
        .current_dir(dir.path())
        .args(["dep", "rm", &b, &a])
        .assert()
        .failure();
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_ready_and_blocked_classification() {
    let dir = setup_project();
    let t1 = add_task(&dir, "T1");
    let t2 = add_task(&dir, "T2");
    let t3 = add_task(&dir, "T3");

    // T1 depends on T3 (done), T2 depends on T1 (pending)
    add_dep(&dir, &t1, &t3);
    add_dep(&dir, &t2, &t1);
    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &t3])
        .assert()
        .success();

    tether_cmd()
        .current_dir(dir.path())
        .args(["ready"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T1").and(predicate::str::contains("T2").not()));

    tether_cmd()
        .current_dir(dir.path())
        .args(["blocked"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T2").and(predicate::str::contains(&t1)));
}

#[test]
fn test_unconstrained_tasks_not_listed() {
    let dir = setup_project();
    add_task(&dir, "Loose end");

    tether_cmd()
        .current_dir(dir.path())
        .args(["ready"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks ready"));

    tether_cmd()
        .current_dir(dir.path())
        .args(["blocked"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No blocked tasks"));
}

#[test]
fn test_critical_path_order() {
    let dir = setup_project();
    let a = add_task(&dir, "First");
    let b = add_task(&dir, "Second");
    let c = add_task(&dir, "Third");

    // Chain: c depends on b depends on a
    add_dep(&dir, &b, &a);
    add_dep(&dir, &c, &b);

    let output = tether_cmd()
        .current_dir(dir.path())
        .args(["path", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();

    assert_eq!(ids, vec![a.as_str(), b.as_str(), c.as_str()]);
}

#[test]
fn test_critical_path_empty_without_edges() {
    let dir = setup_project();
    add_task(&dir, "Alone");

    tether_cmd()
        .current_dir(dir.path())
        .args(["path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No dependency chains"));
}

#[test]
fn test_status_overview() {
    let dir = setup_project();
    let a = add_task(&dir, "A");
    let b = add_task(&dir, "B");
    add_dep(&dir, &b, &a);

    tether_cmd()
        .current_dir(dir.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Tasks: 2 total")
                .and(predicate::str::contains("Blocked:         1")),
        );
}

#[test]
fn test_timeline_buckets() {
    let dir = setup_project();

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Past due", "--deadline", "2020-01-01"])
        .assert()
        .success();
    add_task(&dir, "Unscheduled");

    tether_cmd()
        .current_dir(dir.path())
        .args(["timeline"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Overdue")
                .and(predicate::str::contains("Past due"))
                .and(predicate::str::contains("No deadline")),
        );
}

// =============================================================================
// Integrity Tests
// =============================================================================

#[test]
fn test_check_passes_on_valid_store() {
    let dir = setup_project();
    let a = add_task(&dir, "A");
    let b = add_task(&dir, "B");
    add_dep(&dir, &b, &a);

    tether_cmd()
        .current_dir(dir.path())
        .args(["check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found"));
}

#[test]
fn test_check_detects_hand_edited_cycle() {
    let dir = setup_project();
    let a = add_task(&dir, "A");
    let b = add_task(&dir, "B");

    // Bypass `dep add` and write a cyclic edge set directly.
    let deps_path = dir.path().join(".tether/deps.jsonl");
    let contents = format!(
        "{}\n{}\n",
        serde_json::json!({"id": "d-0000001", "task": a, "depends_on": b}),
        serde_json::json!({"id": "d-0000002", "task": b, "depends_on": a}),
    );
    fs::write(&deps_path, contents).unwrap();

    tether_cmd()
        .current_dir(dir.path())
        .args(["check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle"));
}

#[test]
fn test_check_reports_dangling_edges() {
    let dir = setup_project();
    let a = add_task(&dir, "A");
    let b = add_task(&dir, "B");
    add_dep(&dir, &b, &a);

    tether_cmd()
        .current_dir(dir.path())
        .args(["task", "rm", &a])
        .assert()
        .success();

    // rm cascades, so re-introduce a dangling edge by hand
    let deps_path = dir.path().join(".tether/deps.jsonl");
    let contents = format!(
        "{}\n",
        serde_json::json!({"id": "d-0000003", "task": b, "depends_on": a}),
    );
    fs::write(&deps_path, contents).unwrap();

    tether_cmd()
        .current_dir(dir.path())
        .args(["check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dangling edges"));
}
