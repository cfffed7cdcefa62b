//! JSONL persistence for the in-memory task store.

use super::inner::InMemoryStoreInner;
use crate::domain::{Task, TaskId};
use crate::error::{Result, StorageError};
use crate::storage::TaskStore;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use taskweave_jsonl::{read_jsonl_resilient, write_jsonl_atomic, Warning as JsonlWarning};
use tokio::sync::Mutex;

/// Non-fatal problems found while loading `tasks.jsonl`.
///
/// The offending line or record is skipped; everything else loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A line could not be decoded into a task (bad JSON, bad id, wrong shape).
    MalformedLine(JsonlWarning),

    /// A record decoded but failed field validation.
    InvalidTask {
        /// Id of the rejected task
        task_id: TaskId,
        /// Validation message
        error: String,
    },

    /// A second record with an id already loaded; the first one wins.
    DuplicateTask {
        /// The repeated id
        task_id: TaskId,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine(warning) => write!(f, "{warning}"),
            Self::InvalidTask { task_id, error } => {
                write!(f, "skipped invalid task {task_id}: {error}")
            }
            Self::DuplicateTask { task_id } => write!(f, "skipped duplicate task {task_id}"),
        }
    }
}

/// Read a tasks file into fresh store state.
pub(crate) async fn read_jsonl(path: &Path) -> Result<(InMemoryStoreInner, Vec<LoadWarning>)> {
    let (records, jsonl_warnings) = read_jsonl_resilient::<Task, _>(path)
        .await
        .map_err(StorageError::from)?;

    let mut warnings: Vec<LoadWarning> = jsonl_warnings
        .into_iter()
        .map(LoadWarning::MalformedLine)
        .collect();

    let mut inner = InMemoryStoreInner::new();
    let mut seen = HashSet::new();
    for task in records {
        if let Err(error) = task.validate() {
            warnings.push(LoadWarning::InvalidTask {
                task_id: task.id,
                error,
            });
            continue;
        }
        if !seen.insert(task.id.clone()) {
            warnings.push(LoadWarning::DuplicateTask { task_id: task.id });
            continue;
        }
        inner.insert(task);
    }

    Ok((inner, warnings))
}

/// Load a task store from a JSONL file.
///
/// Returns the store plus every non-fatal problem encountered.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub async fn load_from_jsonl(path: &Path) -> Result<(Box<dyn TaskStore>, Vec<LoadWarning>)> {
    let (inner, warnings) = read_jsonl(path).await?;
    Ok((Box::new(Arc::new(Mutex::new(inner))), warnings))
}

/// Write every task in the store to a JSONL file atomically.
///
/// # Errors
///
/// Returns an error if serialization or any file operation fails; the
/// previous file is left intact in that case.
pub async fn save_to_jsonl(store: &dyn TaskStore, path: &Path) -> Result<()> {
    let tasks = store.export_all().await?;
    write_jsonl_atomic(path, &tasks)
        .await
        .map_err(StorageError::from)?;
    tracing::debug!(path = %path.display(), count = tasks.len(), "Tasks saved");
    Ok(())
}
