//! Tether - A local-first to-do CLI with task dependencies
//!
//! Tether tracks tasks and the dependency edges between them. The dependency
//! graph engine ([`domain`]) answers three questions: would a proposed edge
//! create a cycle, which tasks are ready versus blocked, and what is the
//! longest dependency chain (the critical path).

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{DependencyEdge, EdgeId, Task, TaskId, TaskStatus};
