//! Dependency edge domain model
//!
//! An edge `{task, depends_on}` states that `task` cannot start until
//! `depends_on` is completed. Edges are owned by the host application;
//! the graph engine only reads them.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{EdgeId, TaskId};

#[derive(Debug, Error, PartialEq)]
pub enum EdgeError {
    #[error("Self-dependency not allowed: {0}")]
    SelfLoop(TaskId),
}

/// A directed dependency edge between two tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Unique identifier for the edge itself
    pub id: EdgeId,

    /// The dependent task
    pub task: TaskId,

    /// The prerequisite task
    pub depends_on: TaskId,
}

impl DependencyEdge {
    /// Creates a new edge stating that `task` depends on `depends_on`.
    ///
    /// Rejects self-loops; cycle safety across the whole edge set is the
    /// caller's responsibility via [`would_create_cycle`].
    ///
    /// [`would_create_cycle`]: super::graph::would_create_cycle
    pub fn new(task: TaskId, depends_on: TaskId) -> Result<Self, EdgeError> {
        if task == depends_on {
            return Err(EdgeError::SelfLoop(task));
        }

        Ok(Self {
            id: EdgeId::new(&task, &depends_on, Utc::now()),
            task,
            depends_on,
        })
    }

    /// Returns true if this edge touches the given task on either end
    pub fn touches(&self, task_id: &TaskId) -> bool {
        &self.task == task_id || &self.depends_on == task_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_id(title: &str) -> TaskId {
        TaskId::new(title, Utc::now())
    }

    #[test]
    fn new_edge_links_endpoints() {
        let a = make_id("A");
        let b = make_id("B");

        let edge = DependencyEdge::new(a.clone(), b.clone()).unwrap();
        assert_eq!(edge.task, a);
        assert_eq!(edge.depends_on, b);
    }

    #[test]
    fn self_loop_rejected() {
        let a = make_id("A");

        let result = DependencyEdge::new(a.clone(), a.clone());
        assert_eq!(result, Err(EdgeError::SelfLoop(a)));
    }

    #[test]
    fn touches_either_endpoint() {
        let a = make_id("A");
        let b = make_id("B");
        let c = make_id("C");

        let edge = DependencyEdge::new(a.clone(), b.clone()).unwrap();
        assert!(edge.touches(&a));
        assert!(edge.touches(&b));
        assert!(!edge.touches(&c));
    }

    #[test]
    fn serde_roundtrip() {
        let edge = DependencyEdge::new(make_id("A"), make_id("B")).unwrap();

        let json = serde_json::to_string(&edge).unwrap();
        let parsed: DependencyEdge = serde_json::from_str(&json).unwrap();

        assert_eq!(edge, parsed);
    }
}
