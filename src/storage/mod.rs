//! # Storage Layer
//!
//! Persistence layer for Tether with git-friendly file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSONL (one JSON per line) | `.tether/tasks.jsonl` |
//! | Dependency edges | JSONL | `.tether/deps.jsonl` |
//! | Config | TOML | `.tether/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - Both stores use file locking (`fs2`) for concurrent access
//! - All writes are atomic (temp file + rename)
//! - Stores preserve line order: the graph engine's determinism
//!   (classification order, critical-path tie-breaks) follows it
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a Tether project
//! - [`TaskStore`] - Read/write tasks as JSONL
//! - [`EdgeStore`] - Read/write dependency edges as JSONL
//! - [`Config`] - Project configuration

mod config;
mod edges;
mod jsonl;
mod project;

pub use config::{Config, ConfigError, ProjectConfig};
pub use edges::EdgeStore;
pub use jsonl::TaskStore;
pub use project::{Project, ProjectError};
