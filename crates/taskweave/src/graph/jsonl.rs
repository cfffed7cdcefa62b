//! On-disk form of the edge set (`dependencies.jsonl`).
//!
//! One edge per line with its scope flattened in:
//!
//! ```json
//! {"user_id":"personal","project_id":"default","task_id":"...","depends_on_task_id":"...","created_at":"..."}
//! ```

use super::EdgeRejection;
use crate::domain::{DependencyEdge, Scope, TaskId};
use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use taskweave_jsonl::{read_jsonl_resilient, write_jsonl_atomic, Warning as JsonlWarning};

/// A persisted dependency edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Scope the edge belongs to
    #[serde(flatten)]
    pub scope: Scope,

    /// The dependent task
    pub task_id: TaskId,

    /// The prerequisite task
    pub depends_on_task_id: TaskId,

    /// When the edge was created
    pub created_at: DateTime<Utc>,
}

impl EdgeRecord {
    /// Pair an edge with its scope.
    #[must_use]
    pub fn new(scope: Scope, edge: DependencyEdge) -> Self {
        Self {
            scope,
            task_id: edge.task_id,
            depends_on_task_id: edge.depends_on_task_id,
            created_at: edge.created_at,
        }
    }
}

/// Non-fatal problems found while loading `dependencies.jsonl`.
///
/// Each one means a line or edge was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeLoadWarning {
    /// The line could not be decoded into an edge.
    MalformedLine(JsonlWarning),

    /// The record's scope has an empty user or project.
    InvalidScope {
        /// The dependent task of the skipped edge
        task_id: TaskId,
    },

    /// One of the endpoints does not exist in the edge's scope.
    Orphaned {
        /// Scope of the skipped edge
        scope: Scope,
        /// The dependent task
        task_id: TaskId,
        /// The prerequisite task
        depends_on_task_id: TaskId,
        /// The endpoint that is missing
        missing: TaskId,
    },

    /// The edge would break the graph invariants.
    Rejected {
        /// Scope of the skipped edge
        scope: Scope,
        /// The dependent task
        task_id: TaskId,
        /// The prerequisite task
        depends_on_task_id: TaskId,
        /// Which invariant it broke
        reason: EdgeRejection,
    },
}

impl fmt::Display for EdgeLoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine(warning) => write!(f, "{warning}"),
            Self::InvalidScope { task_id } => {
                write!(f, "skipped edge from {task_id}: empty user or project")
            }
            Self::Orphaned {
                scope,
                task_id,
                depends_on_task_id,
                missing,
            } => write!(
                f,
                "skipped edge {task_id} -> {depends_on_task_id} in {scope}: task {missing} not found"
            ),
            Self::Rejected {
                scope,
                task_id,
                depends_on_task_id,
                reason,
            } => {
                let why = match reason {
                    EdgeRejection::SelfLoop => "self-dependency",
                    EdgeRejection::Cycle => "would create a cycle",
                    EdgeRejection::Duplicate => "duplicate",
                };
                write!(
                    f,
                    "skipped edge {task_id} -> {depends_on_task_id} in {scope}: {why}"
                )
            }
        }
    }
}

/// Read edge records, skipping undecodable lines.
pub(crate) async fn read_edges(path: &Path) -> Result<(Vec<EdgeRecord>, Vec<EdgeLoadWarning>)> {
    let (records, jsonl_warnings) = read_jsonl_resilient::<EdgeRecord, _>(path)
        .await
        .map_err(StorageError::from)?;

    let mut warnings: Vec<EdgeLoadWarning> = jsonl_warnings
        .into_iter()
        .map(EdgeLoadWarning::MalformedLine)
        .collect();

    let mut valid = Vec::with_capacity(records.len());
    for record in records {
        if record.scope.validate().is_err() {
            warnings.push(EdgeLoadWarning::InvalidScope {
                task_id: record.task_id,
            });
            continue;
        }
        valid.push(record);
    }

    Ok((valid, warnings))
}

/// Atomically replace the edge file.
pub(crate) async fn write_edges(path: &Path, records: &[EdgeRecord]) -> Result<()> {
    write_jsonl_atomic(path, records)
        .await
        .map_err(StorageError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_flattens_scope() {
        let record = EdgeRecord {
            scope: Scope::new("personal", "default").unwrap(),
            task_id: TaskId::generate(),
            depends_on_task_id: TaskId::generate(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["user_id"], "personal");
        assert_eq!(value["project_id"], "default");
        assert!(value.get("scope").is_none());

        let back: EdgeRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn record_with_bad_id_does_not_decode() {
        let json = r#"{"user_id":"u","project_id":"p","task_id":"nope","depends_on_task_id":"67e55044-10b1-426f-9247-bb680e5fe0c8","created_at":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<EdgeRecord>(json).is_err());
    }

    #[test]
    fn rejected_warning_names_the_reason() {
        let warning = EdgeLoadWarning::Rejected {
            scope: Scope::new("u", "p").unwrap(),
            task_id: TaskId::generate(),
            depends_on_task_id: TaskId::generate(),
            reason: EdgeRejection::Cycle,
        };
        assert!(warning.to_string().contains("cycle"));
    }
}
