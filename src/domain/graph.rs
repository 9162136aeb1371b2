//! Dependency graph engine
//!
//! A pure, stateless query layer over the task and edge collections: cycle
//! safety for a proposed edge, blocked/ready classification, and the
//! critical path (longest dependency chain). Every function re-derives its
//! result from the inputs; nothing is cached between calls and nothing is
//! mutated.
//!
//! The engine never errors. Edges referencing unknown tasks are skipped
//! through natural lookup failure, and an empty graph degrades to empty
//! results.

use std::collections::{HashMap, HashSet};

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};

use super::edge::DependencyEdge;
use super::id::TaskId;
use super::task::{Task, TaskStatus};

/// Result of [`classify_tasks`]: two disjoint sets in task-collection order.
///
/// Tasks with no dependency edges belong to neither set; they are simply
/// unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Pending tasks whose prerequisites are all complete (and have at least one)
    pub ready: Vec<TaskId>,

    /// Pending tasks with at least one incomplete prerequisite
    pub blocked: Vec<TaskId>,
}

/// Returns true if adding an edge `task -> depends_on` would close a cycle.
///
/// Walks the existing `depends_on` edges transitively from the proposed
/// prerequisite with an explicit stack and visited set; reaching `task`
/// means the new edge would complete a loop. A self-reference is reported
/// as a degenerate cycle. Identifiers absent from the edge set simply
/// yield no path, so the check is permissive for unknown tasks.
pub fn would_create_cycle(task: &TaskId, depends_on: &TaskId, edges: &[DependencyEdge]) -> bool {
    if task == depends_on {
        return true;
    }

    let mut visited: HashSet<&TaskId> = HashSet::new();
    let mut stack = vec![depends_on];

    while let Some(current) = stack.pop() {
        if current == task {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        for edge in edges {
            if &edge.task == current && !visited.contains(&edge.depends_on) {
                stack.push(&edge.depends_on);
            }
        }
    }

    false
}

/// Splits pending tasks into ready and blocked sets.
///
/// A pending task with at least one incomplete prerequisite is blocked; one
/// whose prerequisites all resolve and are complete (with at least one edge)
/// is ready. Edges whose prerequisite does not resolve to a known task are
/// dropped. Output order follows the task collection.
pub fn classify_tasks(tasks: &[Task], edges: &[DependencyEdge]) -> Classification {
    let statuses: HashMap<&TaskId, TaskStatus> =
        tasks.iter().map(|t| (&t.id, t.status)).collect();

    let mut classification = Classification::default();

    for task in tasks {
        if task.is_complete() {
            continue;
        }

        let mut has_prerequisite = false;
        let mut has_incomplete = false;

        for edge in edges {
            if edge.task != task.id {
                continue;
            }
            let Some(status) = statuses.get(&edge.depends_on) else {
                continue;
            };
            has_prerequisite = true;
            if !status.is_complete() {
                has_incomplete = true;
            }
        }

        if has_incomplete {
            classification.blocked.push(task.id.clone());
        } else if has_prerequisite {
            classification.ready.push(task.id.clone());
        }
    }

    classification
}

/// Returns the incomplete prerequisites of a task, in edge order.
pub fn blockers(task_id: &TaskId, tasks: &[Task], edges: &[DependencyEdge]) -> Vec<TaskId> {
    let statuses: HashMap<&TaskId, TaskStatus> =
        tasks.iter().map(|t| (&t.id, t.status)).collect();

    edges
        .iter()
        .filter(|e| &e.task == task_id)
        .filter(|e| {
            statuses
                .get(&e.depends_on)
                .map(|s| !s.is_complete())
                .unwrap_or(false)
        })
        .map(|e| e.depends_on.clone())
        .collect()
}

/// Computes the critical path: the single longest chain of tasks connected
/// by dependency edges, from a root (no prerequisites) forward to a task
/// with no dependents.
///
/// Completed tasks are not excluded, so a fully finished chain still counts.
/// Roots are visited in task-collection order and children in edge-insertion
/// order; the first longest path found wins ties. Returns an empty sequence
/// when no edge resolves to known tasks.
pub fn critical_path<'a>(tasks: &'a [Task], edges: &'a [DependencyEdge]) -> Vec<Task> {
    let known: HashMap<&TaskId, &Task> = tasks.iter().map(|t| (&t.id, t)).collect();

    // Forward adjacency: prerequisite -> dependent, children in edge order.
    let mut adjacency: HashMap<&'a TaskId, Vec<&'a TaskId>> = HashMap::new();
    let mut in_degree: HashMap<&'a TaskId, usize> = HashMap::new();

    for edge in edges {
        if !known.contains_key(&edge.task) || !known.contains_key(&edge.depends_on) {
            continue;
        }
        adjacency.entry(&edge.depends_on).or_default().push(&edge.task);
        *in_degree.entry(&edge.task).or_insert(0) += 1;
    }

    if adjacency.is_empty() {
        return Vec::new();
    }

    // Longest chain starting at each node: (length, next hop).
    let mut memo: HashMap<&'a TaskId, (usize, Option<&'a TaskId>)> = HashMap::new();

    let mut best: Option<(usize, &TaskId)> = None;
    for task in tasks {
        if in_degree.get(&task.id).copied().unwrap_or(0) != 0 {
            continue;
        }
        longest_from(&task.id, &adjacency, &mut memo);
        let length = memo.get(&task.id).map(|&(len, _)| len).unwrap_or(1);
        if best.map(|(len, _)| length > len).unwrap_or(true) {
            best = Some((length, &task.id));
        }
    }

    let Some((_, root)) = best else {
        return Vec::new();
    };

    // Reconstruct by following next hops from the winning root.
    let mut path = Vec::new();
    let mut current = Some(root);
    while let Some(id) = current {
        if let Some(task) = known.get(id) {
            path.push((*task).clone());
        }
        current = memo.get(id).and_then(|&(_, next)| next);
    }

    path
}

/// Fills `memo` with the longest forward chain from `start` for every node
/// reachable from it. Iterative post-order with an explicit stack; edges
/// that would revisit a node currently being expanded are skipped, so the
/// traversal terminates even on a malformed cyclic edge set.
fn longest_from<'a>(
    start: &'a TaskId,
    adjacency: &HashMap<&'a TaskId, Vec<&'a TaskId>>,
    memo: &mut HashMap<&'a TaskId, (usize, Option<&'a TaskId>)>,
) {
    let mut stack = vec![(start, false)];
    let mut in_progress: HashSet<&'a TaskId> = HashSet::new();

    while let Some((node, children_done)) = stack.pop() {
        if children_done {
            in_progress.remove(node);

            let mut length = 1;
            let mut next = None;
            if let Some(children) = adjacency.get(node) {
                for child in children {
                    if let Some(&(child_len, _)) = memo.get(child) {
                        // Strictly greater keeps the first child on ties.
                        if child_len + 1 > length {
                            length = child_len + 1;
                            next = Some(*child);
                        }
                    }
                }
            }
            memo.insert(node, (length, next));
        } else {
            if memo.contains_key(node) || in_progress.contains(node) {
                continue;
            }
            in_progress.insert(node);
            stack.push((node, true));
            if let Some(children) = adjacency.get(node) {
                for child in children.iter().rev() {
                    if !memo.contains_key(child) && !in_progress.contains(child) {
                        stack.push((child, false));
                    }
                }
            }
        }
    }
}

/// Returns true if the edge set contains a directed cycle.
///
/// Whole-set integrity pass for edges that may have bypassed the insertion
/// check (bulk import, hand-edited store files).
pub fn contains_cycle(edges: &[DependencyEdge]) -> bool {
    let mut graph: DiGraph<&TaskId, ()> = DiGraph::new();
    let mut nodes: HashMap<&TaskId, NodeIndex> = HashMap::new();

    for edge in edges {
        let from = node_index(&mut graph, &mut nodes, &edge.depends_on);
        let to = node_index(&mut graph, &mut nodes, &edge.task);
        graph.add_edge(from, to, ());
    }

    is_cyclic_directed(&graph)
}

fn node_index<'a>(
    graph: &mut DiGraph<&'a TaskId, ()>,
    nodes: &mut HashMap<&'a TaskId, NodeIndex>,
    id: &'a TaskId,
) -> NodeIndex {
    *nodes.entry(id).or_insert_with(|| graph.add_node(id))
}

/// Returns edges referencing a task that does not exist.
pub fn dangling_edges<'a>(
    tasks: &[Task],
    edges: &'a [DependencyEdge],
) -> Vec<&'a DependencyEdge> {
    let known: HashSet<&TaskId> = tasks.iter().map(|t| &t.id).collect();

    edges
        .iter()
        .filter(|e| !known.contains(&e.task) || !known.contains(&e.depends_on))
        .collect()
}
