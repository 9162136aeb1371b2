//! Domain models for Tether
//!
//! Contains the core business logic without any I/O concerns.

mod edge;
mod graph;
mod id;
mod task;

pub use edge::{DependencyEdge, EdgeError};
pub use graph::{
    blockers, classify_tasks, contains_cycle, critical_path, dangling_edges, would_create_cycle,
    Classification,
};
pub use id::{EdgeId, IdError, TaskId};
pub use task::{Task, TaskStatus};
