//! Task storage layer.
//!
//! [`TaskStore`] is the boundary the dependency core consumes: it only needs
//! [`TaskStore::task_exists`], [`TaskStore::task_status`] and
//! [`TaskStore::get_task`]. The board uses the rest for task CRUD.
//!
//! Backends:
//!
//! - **In-memory**: `HashMap` behind `Arc<Mutex<_>>`, ephemeral
//! - **JSONL**: the in-memory store wrapped so that [`TaskStore::save`]
//!   writes `tasks.jsonl` atomically
//!
//! Every method takes `&self`; implementations serialize access internally
//! so one store can be shared across concurrent callers via `Arc`.
//!
//! # Example
//!
//! ```no_run
//! use taskweave::domain::{NewTask, Scope};
//! use taskweave::storage::{create_task_store, StorageBackend};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let store = create_task_store(StorageBackend::InMemory).await?;
//!     let scope = Scope::new("personal", "default").map_err(anyhow::Error::msg)?;
//!
//!     let task = store.create_task(&scope, NewTask::titled("Write the README")).await?;
//!     println!("Created task: {}", task.id);
//!     Ok(())
//! }
//! ```

use crate::domain::{NewTask, PositionUpdate, Scope, Task, TaskId, TaskStatus, TaskUpdate};
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod in_memory;
pub(crate) mod sorting;

/// Core storage trait for tasks.
///
/// Tasks are always addressed through a [`Scope`]; a task that exists under
/// a different scope is reported as missing.
#[async_trait]
pub trait TaskStore: Send + Sync {
    // ========== Boundary used by the dependency graph ==========

    /// Whether the task exists in the scope.
    async fn task_exists(&self, scope: &Scope, id: &TaskId) -> Result<bool> {
        Ok(self.get_task(scope, id).await?.is_some())
    }

    /// Current status of the task, or `None` if it does not exist in the scope.
    async fn task_status(&self, scope: &Scope, id: &TaskId) -> Result<Option<TaskStatus>> {
        Ok(self.get_task(scope, id).await?.map(|task| task.status))
    }

    /// Get a task by id.
    async fn get_task(&self, scope: &Scope, id: &TaskId) -> Result<Option<Task>>;

    /// All tasks in the scope, ordered by column position then creation time.
    async fn list_tasks(&self, scope: &Scope) -> Result<Vec<Task>>;

    // ========== CRUD ==========

    /// Create a task at the bottom of its status column.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the title or description is invalid.
    async fn create_task(&self, scope: &Scope, task: NewTask) -> Result<Task>;

    /// Apply the `Some` fields of `updates`.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` if the update is empty or a field is invalid
    /// - `Error::TaskNotFound` if the task does not exist in the scope
    async fn update_task(&self, scope: &Scope, id: &TaskId, updates: TaskUpdate) -> Result<Task>;

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if the task does not exist in the scope.
    async fn delete_task(&self, scope: &Scope, id: &TaskId) -> Result<()>;

    /// Apply a batch of column moves atomically.
    ///
    /// Either every move is applied or none is. Returns the number applied.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` if the batch is empty
    /// - `Error::TaskNotFound` if any task does not exist in the scope
    async fn update_positions(&self, scope: &Scope, updates: &[PositionUpdate]) -> Result<usize>;

    // ========== Batch Operations ==========

    /// Bulk-load tasks (used when loading from JSONL).
    async fn import_tasks(&self, tasks: Vec<Task>) -> Result<()>;

    /// Every task across all scopes.
    async fn export_all(&self) -> Result<Vec<Task>>;

    // ========== Persistence ==========

    /// Persist changes. No-op for purely in-memory stores.
    async fn save(&self) -> Result<()>;

    /// Discard unsaved changes and reload from persistent storage.
    ///
    /// No-op for purely in-memory stores.
    async fn reload(&self) -> Result<()>;
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// JSONL file storage (persistent)
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// Returns the data file path for file-based backends.
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// Adds JSONL file persistence to the in-memory store.
///
/// Reads go straight to memory; [`TaskStore::save`] rewrites the file.
struct JsonlBackedStore {
    inner: in_memory::InMemoryStore,
    path: PathBuf,
}

impl JsonlBackedStore {
    async fn open(path: PathBuf) -> Result<Self> {
        let inner = std::sync::Arc::new(tokio::sync::Mutex::new(load_or_empty(&path).await?));
        Ok(Self { inner, path })
    }
}

async fn load_or_empty(path: &Path) -> Result<in_memory::InMemoryStoreInner> {
    if !path.exists() {
        // First run: nothing written yet.
        return Ok(in_memory::InMemoryStoreInner::new());
    }

    let (inner, warnings) = in_memory::read_jsonl(path).await?;
    for warning in &warnings {
        tracing::warn!(path = %path.display(), %warning, "Task file load warning");
    }
    Ok(inner)
}

#[async_trait]
impl TaskStore for JsonlBackedStore {
    async fn task_exists(&self, scope: &Scope, id: &TaskId) -> Result<bool> {
        self.inner.task_exists(scope, id).await
    }

    async fn task_status(&self, scope: &Scope, id: &TaskId) -> Result<Option<TaskStatus>> {
        self.inner.task_status(scope, id).await
    }

    async fn get_task(&self, scope: &Scope, id: &TaskId) -> Result<Option<Task>> {
        self.inner.get_task(scope, id).await
    }

    async fn list_tasks(&self, scope: &Scope) -> Result<Vec<Task>> {
        self.inner.list_tasks(scope).await
    }

    async fn create_task(&self, scope: &Scope, task: NewTask) -> Result<Task> {
        self.inner.create_task(scope, task).await
    }

    async fn update_task(&self, scope: &Scope, id: &TaskId, updates: TaskUpdate) -> Result<Task> {
        self.inner.update_task(scope, id, updates).await
    }

    async fn delete_task(&self, scope: &Scope, id: &TaskId) -> Result<()> {
        self.inner.delete_task(scope, id).await
    }

    async fn update_positions(&self, scope: &Scope, updates: &[PositionUpdate]) -> Result<usize> {
        self.inner.update_positions(scope, updates).await
    }

    async fn import_tasks(&self, tasks: Vec<Task>) -> Result<()> {
        self.inner.import_tasks(tasks).await
    }

    async fn export_all(&self) -> Result<Vec<Task>> {
        self.inner.export_all().await
    }

    async fn save(&self) -> Result<()> {
        in_memory::save_to_jsonl(&self.inner, &self.path).await
    }

    async fn reload(&self) -> Result<()> {
        let fresh = load_or_empty(&self.path).await?;
        *self.inner.lock().await = fresh;
        Ok(())
    }
}

/// Create a task store for the given backend.
///
/// # Errors
///
/// Returns an error if an existing JSONL file cannot be read.
pub async fn create_task_store(backend: StorageBackend) -> Result<Box<dyn TaskStore>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_store()),
        StorageBackend::Jsonl(path) => Ok(Box::new(JsonlBackedStore::open(path).await?)),
    }
}

/// Parse a backend name from configuration.
///
/// # Errors
///
/// Returns `StorageError::UnsupportedBackend` for unknown names.
pub fn backend_from_name(name: &str, data_file: PathBuf) -> Result<StorageBackend> {
    match name {
        "memory" => Ok(StorageBackend::InMemory),
        "jsonl" => Ok(StorageBackend::Jsonl(data_file)),
        other => Err(StorageError::UnsupportedBackend(other.to_string()).into()),
    }
}
