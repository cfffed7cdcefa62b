//! Error types for taskweave operations.
//!
//! Validation and graph-invariant violations are reported before any write
//! happens. Storage failures surface as-is; nothing here retries.

use crate::domain::TaskId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for taskweave operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input: bad ids, empty scope, invalid fields, empty updates.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced task does not exist in the scope.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// A task was asked to depend on itself.
    #[error("A task cannot depend on itself: {0}")]
    SelfDependency(TaskId),

    /// The proposed edge would close a cycle.
    #[error("Circular dependency: {from} -> {to} would create a cycle")]
    CircularDependency {
        /// The dependent task of the rejected edge
        from: TaskId,
        /// The prerequisite of the rejected edge
        to: TaskId,
    },

    /// The exact ordered edge already exists.
    #[error("Dependency already exists: {from} -> {to}")]
    DuplicateDependency {
        /// The dependent task
        from: TaskId,
        /// The prerequisite task
        to: TaskId,
    },

    /// A task cannot be marked done while prerequisites are unfinished.
    #[error("Cannot mark {task_id} done: {completed} of {total} dependencies complete")]
    DependenciesIncomplete {
        /// The task whose status change was rejected
        task_id: TaskId,
        /// Number of prerequisites
        total: usize,
        /// Number of prerequisites already done
        completed: usize,
    },

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Persistence failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Workspace configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Stable machine-readable name for the error kind.
    ///
    /// Callers rendering errors use this to tell a cycle apart from a
    /// missing task or a duplicate edge.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::TaskNotFound(_) => "not_found",
            Self::SelfDependency(_) => "self_dependency",
            Self::CircularDependency { .. } => "cycle",
            Self::DuplicateDependency { .. } => "duplicate",
            Self::DependenciesIncomplete { .. } => "dependencies_incomplete",
            Self::Io(_) | Self::Json(_) | Self::Storage(_) => "storage",
            Self::Config(_) => "config",
        }
    }
}

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a JSONL file failed.
    #[error("JSONL error: {0}")]
    Jsonl(#[from] taskweave_jsonl::Error),

    /// The configured backend is not available.
    #[error("Unsupported storage backend: {0}")]
    UnsupportedBackend(String),
}

/// Errors loading or creating workspace configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `.taskweave/` directory found from the working directory upwards.
    #[error("Not a taskweave workspace (or any parent directory). Run 'taskweave init' first.")]
    NotInitialized,

    /// `init` found an existing workspace.
    #[error("Taskweave is already initialized: found '{}'", .0.display())]
    AlreadyInitialized(PathBuf),

    /// The config file could not be parsed or written.
    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A config value is invalid.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A specialized Result type for taskweave operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_errors_have_distinct_kinds() {
        let a = TaskId::generate();
        let b = TaskId::generate();
        let kinds = [
            Error::SelfDependency(a.clone()).kind(),
            Error::CircularDependency {
                from: a.clone(),
                to: b.clone(),
            }
            .kind(),
            Error::DuplicateDependency {
                from: a.clone(),
                to: b,
            }
            .kind(),
            Error::TaskNotFound(a).kind(),
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }

    #[test]
    fn not_initialized_message_mentions_init() {
        let err: Error = ConfigError::NotInitialized.into();
        assert!(err.to_string().contains("taskweave init"));
    }
}
