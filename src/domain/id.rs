//! Identifiers for tasks and dependency edges
//!
//! ID Format:
//! - Task IDs: `t-{7-char-hash}` (e.g., `t-9d3e5f2`)
//! - Edge IDs: `d-{7-char-hash}` (e.g., `d-4a81c0e`)
//!
//! Hashes are derived from content + creation timestamp, ensuring uniqueness.
//! The same title at different times produces different IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid task ID format: expected 't-{{7-char-hash}}', got '{0}'")]
    InvalidTaskId(String),

    #[error("Invalid edge ID format: expected 'd-{{7-char-hash}}', got '{0}'")]
    InvalidEdgeId(String),
}

/// Generates a 7-character hash from an input string and timestamp
fn generate_hash(input: &str, timestamp: DateTime<Utc>) -> String {
    let seed = format!("{}{}", input, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(seed.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

fn valid_hash(hash: &str) -> bool {
    hash.len() == 7 && hash.chars().all(|c| c.is_ascii_hexdigit())
}

/// Task ID in the format `t-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId {
    hash: String,
}

impl TaskId {
    /// Creates a new task ID from title and creation timestamp
    pub fn new(title: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: generate_hash(title, timestamp),
        }
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t-{}", self.hash)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("t-")
            .ok_or_else(|| IdError::InvalidTaskId(s.to_string()))?;

        if !valid_hash(hash) {
            return Err(IdError::InvalidTaskId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_string(),
        })
    }
}

impl TryFrom<String> for TaskId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.to_string()
    }
}

/// Edge ID in the format `d-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EdgeId {
    hash: String,
}

impl EdgeId {
    /// Creates a new edge ID from its endpoints and creation timestamp
    pub fn new(task: &TaskId, depends_on: &TaskId, timestamp: DateTime<Utc>) -> Self {
        let input = format!("{}->{}", task, depends_on);
        Self {
            hash: generate_hash(&input, timestamp),
        }
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d-{}", self.hash)
    }
}

impl FromStr for EdgeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("d-")
            .ok_or_else(|| IdError::InvalidEdgeId(s.to_string()))?;

        if !valid_hash(hash) {
            return Err(IdError::InvalidEdgeId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_string(),
        })
    }
}

impl TryFrom<String> for EdgeId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EdgeId> for String {
    fn from(id: EdgeId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_unique_for_different_timestamps() {
        let title = "Same Title";
        let ts1 = Utc::now();
        let ts2 = ts1 + chrono::Duration::nanoseconds(1);

        let id1 = TaskId::new(title, ts1);
        let id2 = TaskId::new(title, ts2);

        assert_ne!(id1, id2);
    }

    #[test]
    fn task_id_format_is_correct() {
        let id = TaskId::new("Test", Utc::now());
        let s = id.to_string();

        assert!(s.starts_with("t-"));
        assert_eq!(s.len(), 9); // "t-" + 7 chars
    }

    #[test]
    fn task_id_parses_correctly() {
        let original = TaskId::new("Test", Utc::now());
        let s = original.to_string();
        let parsed: TaskId = s.parse().unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn task_id_rejects_invalid_format() {
        assert!("invalid".parse::<TaskId>().is_err());
        assert!("t-short".parse::<TaskId>().is_err());
        assert!("t-toolonggg".parse::<TaskId>().is_err());
        assert!("t-gggggg1".parse::<TaskId>().is_err()); // 'g' is not hex
        assert!("d-1234567".parse::<TaskId>().is_err()); // wrong prefix
    }

    #[test]
    fn edge_id_format_is_correct() {
        let ts = Utc::now();
        let t1 = TaskId::new("A", ts);
        let t2 = TaskId::new("B", ts);
        let id = EdgeId::new(&t1, &t2, ts);
        let s = id.to_string();

        assert!(s.starts_with("d-"));
        assert_eq!(s.len(), 9);
    }

    #[test]
    fn edge_id_parses_correctly() {
        let ts = Utc::now();
        let t1 = TaskId::new("A", ts);
        let t2 = TaskId::new("B", ts);
        let original = EdgeId::new(&t1, &t2, ts);
        let parsed: EdgeId = original.to_string().parse().unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn edge_id_direction_matters() {
        let ts = Utc::now();
        let t1 = TaskId::new("A", ts);
        let t2 = TaskId::new("B", ts);

        assert_ne!(EdgeId::new(&t1, &t2, ts), EdgeId::new(&t2, &t1, ts));
    }

    #[test]
    fn serde_roundtrip_task_id() {
        let original = TaskId::new("Test", Utc::now());
        let json = serde_json::to_string(&original).unwrap();
        let parsed: TaskId = serde_json::from_str(&json).unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn serde_roundtrip_edge_id() {
        let ts = Utc::now();
        let t1 = TaskId::new("A", ts);
        let t2 = TaskId::new("B", ts);
        let original = EdgeId::new(&t1, &t2, ts);
        let json = serde_json::to_string(&original).unwrap();
        let parsed: EdgeId = serde_json::from_str(&json).unwrap();

        assert_eq!(original, parsed);
    }
}
