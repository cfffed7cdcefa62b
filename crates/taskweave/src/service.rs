//! Dependency graph service.
//!
//! Owns the `task depends on prerequisite` edge set for every scope and keeps
//! each scope's graph acyclic. Task records live in a [`TaskStore`]; the
//! service only reads their existence and status.
//!
//! All scopes share one `tokio::sync::Mutex`. [`DependencyGraphService::add_dependency`]
//! holds it across the cycle check, the existence check and the insert, so
//! two concurrent inserts can never each pass against a stale graph.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskweave::domain::{NewTask, Scope};
//! use taskweave::service::DependencyGraphService;
//! use taskweave::storage::in_memory::new_in_memory_store;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let store: Arc<dyn taskweave::storage::TaskStore> = new_in_memory_store().into();
//!     let service = DependencyGraphService::new(Arc::clone(&store));
//!     let scope = Scope::new("personal", "default").map_err(anyhow::Error::msg)?;
//!
//!     let design = store.create_task(&scope, NewTask::titled("Design")).await?;
//!     let build = store.create_task(&scope, NewTask::titled("Build")).await?;
//!     service.add_dependency(&scope, &build.id, &design.id).await?;
//!
//!     let status = service.check_dependencies_complete(&scope, &build.id).await?;
//!     assert!(!status.complete);
//!     Ok(())
//! }
//! ```

use crate::domain::{DependencyEdge, DependencyStatus, Scope, Task, TaskId, TaskStatus};
use crate::error::{Error, Result};
use crate::graph::{
    read_edges, write_edges, DependencyGraph, EdgeLoadWarning, EdgeRecord, EdgeRejection,
};
use crate::storage::sorting::creation_order;
use crate::storage::TaskStore;
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Manages dependency edges between tasks.
pub struct DependencyGraphService {
    tasks: Arc<dyn TaskStore>,
    graphs: Mutex<HashMap<Scope, DependencyGraph>>,
}

impl DependencyGraphService {
    /// Create a service with an empty edge set.
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self {
            tasks,
            graphs: Mutex::new(HashMap::new()),
        }
    }

    /// The task store edges are checked against.
    pub fn task_store(&self) -> &Arc<dyn TaskStore> {
        &self.tasks
    }

    /// Record that `task_id` depends on `depends_on_task_id`.
    ///
    /// # Errors
    ///
    /// Checked in this order, with nothing written on failure:
    /// - `Error::Validation` for an invalid scope
    /// - `Error::SelfDependency` if both ids are the same
    /// - `Error::CircularDependency` if the prerequisite already depends on
    ///   the task, directly or transitively
    /// - `Error::TaskNotFound` if either task is missing from the scope
    /// - `Error::DuplicateDependency` if the edge already exists
    /// - any storage error from the existence check
    pub async fn add_dependency(
        &self,
        scope: &Scope,
        task_id: &TaskId,
        depends_on_task_id: &TaskId,
    ) -> Result<DependencyEdge> {
        scope.validate().map_err(Error::Validation)?;
        if task_id == depends_on_task_id {
            return Err(Error::SelfDependency(task_id.clone()));
        }

        let mut graphs = self.graphs.lock().await;

        if graphs
            .get(scope)
            .is_some_and(|graph| graph.would_create_cycle(task_id, depends_on_task_id))
        {
            return Err(Error::CircularDependency {
                from: task_id.clone(),
                to: depends_on_task_id.clone(),
            });
        }

        for id in [task_id, depends_on_task_id] {
            if !self.tasks.task_exists(scope, id).await? {
                return Err(Error::TaskNotFound(id.clone()));
            }
        }

        let edge = graphs
            .entry(scope.clone())
            .or_default()
            .try_add_edge(task_id, depends_on_task_id, Utc::now())
            .map_err(|rejection| rejection_error(rejection, task_id, depends_on_task_id))?;

        tracing::debug!(
            %scope,
            task_id = %edge.task_id,
            depends_on = %edge.depends_on_task_id,
            "Dependency added"
        );
        Ok(edge)
    }

    /// Delete the edge if present. Returns whether anything was removed.
    ///
    /// Removing an absent edge succeeds and leaves the graph unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an invalid scope.
    pub async fn remove_dependency(
        &self,
        scope: &Scope,
        task_id: &TaskId,
        depends_on_task_id: &TaskId,
    ) -> Result<bool> {
        scope.validate().map_err(Error::Validation)?;

        let mut graphs = self.graphs.lock().await;
        let Some(graph) = graphs.get_mut(scope) else {
            return Ok(false);
        };

        let removed = graph.remove_edge(task_id, depends_on_task_id);
        if graph.is_empty() {
            graphs.remove(scope);
        }
        if removed {
            tracing::debug!(%scope, %task_id, depends_on = %depends_on_task_id, "Dependency removed");
        }
        Ok(removed)
    }

    /// Prerequisites of `task_id`, oldest task first.
    ///
    /// A task with no edges, or one that does not exist, has none.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an invalid scope, or a storage error.
    pub async fn get_dependencies(&self, scope: &Scope, task_id: &TaskId) -> Result<Vec<Task>> {
        let ids = self
            .snapshot(scope, |graph| graph.prerequisites(task_id))
            .await?;
        self.resolve(scope, ids).await
    }

    /// Tasks that depend on `task_id`, oldest task first.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an invalid scope, or a storage error.
    pub async fn get_dependents(&self, scope: &Scope, task_id: &TaskId) -> Result<Vec<Task>> {
        let ids = self
            .snapshot(scope, |graph| graph.dependents(task_id))
            .await?;
        self.resolve(scope, ids).await
    }

    /// Count how many prerequisites of `task_id` are done.
    ///
    /// A prerequisite missing from the store counts towards `total` but never
    /// towards `completed`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an invalid scope, or a storage error.
    pub async fn check_dependencies_complete(
        &self,
        scope: &Scope,
        task_id: &TaskId,
    ) -> Result<DependencyStatus> {
        let prerequisites = self
            .snapshot(scope, |graph| graph.prerequisites(task_id))
            .await?;

        let completed = self.count_done(scope, &prerequisites).await?;
        Ok(DependencyStatus::from_counts(prerequisites.len(), completed))
    }

    /// Run `write` under the graph lock once every task in `finishing` may
    /// move into `done`.
    ///
    /// A task already in `done` passes. No edge can be added between the
    /// check and the write, so the gate and the write see the same edge set.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` for an invalid scope
    /// - `Error::TaskNotFound` if a finishing task is not in the scope
    /// - `Error::DependenciesIncomplete` for the first blocked task
    /// - whatever `write` returns
    pub(crate) async fn gate_finishing<T, W>(
        &self,
        scope: &Scope,
        finishing: &[TaskId],
        write: impl FnOnce() -> W,
    ) -> Result<T>
    where
        W: std::future::Future<Output = Result<T>>,
    {
        if finishing.is_empty() {
            return write().await;
        }
        scope.validate().map_err(Error::Validation)?;

        let graphs = self.graphs.lock().await;
        for id in finishing {
            let status = self
                .tasks
                .task_status(scope, id)
                .await?
                .ok_or_else(|| Error::TaskNotFound(id.clone()))?;
            if status == TaskStatus::Done {
                continue;
            }

            let prerequisites = graphs
                .get(scope)
                .map(|graph| graph.prerequisites(id))
                .unwrap_or_default();
            let completed = self.count_done(scope, &prerequisites).await?;
            if completed < prerequisites.len() {
                return Err(Error::DependenciesIncomplete {
                    task_id: id.clone(),
                    total: prerequisites.len(),
                    completed,
                });
            }
        }

        let result = write().await;
        drop(graphs);
        result
    }

    /// Preview whether `task_id -> depends_on_task_id` would be rejected as
    /// a cycle (or self-dependency), without writing anything.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an invalid scope.
    pub async fn would_create_cycle(
        &self,
        scope: &Scope,
        task_id: &TaskId,
        depends_on_task_id: &TaskId,
    ) -> Result<bool> {
        if task_id == depends_on_task_id {
            scope.validate().map_err(Error::Validation)?;
            return Ok(true);
        }
        self.snapshot(scope, |graph| {
            graph.would_create_cycle(task_id, depends_on_task_id)
        })
        .await
    }

    /// Remove every edge touching `task_id`. Returns how many were removed.
    ///
    /// Called after a task is deleted so no edge outlives its endpoints.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an invalid scope.
    pub async fn prune_task(&self, scope: &Scope, task_id: &TaskId) -> Result<usize> {
        scope.validate().map_err(Error::Validation)?;

        let mut graphs = self.graphs.lock().await;
        let Some(graph) = graphs.get_mut(scope) else {
            return Ok(0);
        };

        let removed = graph.remove_task(task_id);
        if graph.is_empty() {
            graphs.remove(scope);
        }
        if removed > 0 {
            tracing::debug!(%scope, %task_id, removed, "Dependencies pruned");
        }
        Ok(removed)
    }

    /// Number of edges in the scope.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an invalid scope.
    pub async fn edge_count(&self, scope: &Scope) -> Result<usize> {
        self.snapshot(scope, DependencyGraph::edge_count).await
    }

    /// All edges in the scope, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an invalid scope.
    pub async fn edges(&self, scope: &Scope) -> Result<Vec<DependencyEdge>> {
        self.snapshot(scope, DependencyGraph::edges).await
    }

    /// Replace the edge set with the contents of an edge file.
    ///
    /// Edges are replayed in file order through the same checks as
    /// [`Self::add_dependency`]; any edge that is orphaned, duplicated, a
    /// self-loop or would close a cycle is skipped with a warning. The live
    /// edge set is swapped only once the whole file is processed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the task store fails.
    pub async fn load(&self, path: &Path) -> Result<Vec<EdgeLoadWarning>> {
        let (records, mut warnings) = read_edges(path).await?;
        let mut fresh: HashMap<Scope, DependencyGraph> = HashMap::new();

        for record in records {
            if let Some(missing) = self.missing_endpoint(&record).await? {
                warnings.push(EdgeLoadWarning::Orphaned {
                    scope: record.scope,
                    task_id: record.task_id,
                    depends_on_task_id: record.depends_on_task_id,
                    missing,
                });
                continue;
            }

            let graph = fresh.entry(record.scope.clone()).or_default();
            if let Err(reason) =
                graph.try_add_edge(&record.task_id, &record.depends_on_task_id, record.created_at)
            {
                warnings.push(EdgeLoadWarning::Rejected {
                    scope: record.scope,
                    task_id: record.task_id,
                    depends_on_task_id: record.depends_on_task_id,
                    reason,
                });
            }
        }
        fresh.retain(|_, graph| !graph.is_empty());

        for warning in &warnings {
            tracing::warn!(path = %path.display(), %warning, "Dependency file load warning");
        }

        let edge_count: usize = fresh.values().map(DependencyGraph::edge_count).sum();
        *self.graphs.lock().await = fresh;
        tracing::debug!(path = %path.display(), edge_count, "Dependencies loaded");

        Ok(warnings)
    }

    /// Write every edge of every scope to an edge file atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any file operation fails; the previous file is
    /// left intact in that case.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let mut records: Vec<EdgeRecord> = {
            let graphs = self.graphs.lock().await;
            graphs
                .iter()
                .flat_map(|(scope, graph)| {
                    graph
                        .edges()
                        .into_iter()
                        .map(|edge| EdgeRecord::new(scope.clone(), edge))
                })
                .collect()
        };
        records.sort_by(|a, b| {
            a.scope
                .cmp(&b.scope)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.task_id.cmp(&b.task_id))
                .then_with(|| a.depends_on_task_id.cmp(&b.depends_on_task_id))
        });

        write_edges(path, &records).await?;
        tracing::debug!(path = %path.display(), count = records.len(), "Dependencies saved");
        Ok(())
    }

    /// Run `read` against the scope's graph under the lock.
    ///
    /// A scope with no edges reads as an empty graph.
    async fn snapshot<T>(&self, scope: &Scope, read: impl FnOnce(&DependencyGraph) -> T) -> Result<T> {
        scope.validate().map_err(Error::Validation)?;

        let graphs = self.graphs.lock().await;
        Ok(match graphs.get(scope) {
            Some(graph) => read(graph),
            None => read(&DependencyGraph::new()),
        })
    }

    async fn count_done(&self, scope: &Scope, ids: &[TaskId]) -> Result<usize> {
        let mut completed = 0;
        for id in ids {
            if self.tasks.task_status(scope, id).await? == Some(TaskStatus::Done) {
                completed += 1;
            }
        }
        Ok(completed)
    }

    /// Look up tasks by id, dropping any deleted since the snapshot.
    async fn resolve(&self, scope: &Scope, ids: Vec<TaskId>) -> Result<Vec<Task>> {
        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(task) = self.tasks.get_task(scope, &id).await? {
                tasks.push(task);
            }
        }
        tasks.sort_by(creation_order);
        Ok(tasks)
    }

    async fn missing_endpoint(&self, record: &EdgeRecord) -> Result<Option<TaskId>> {
        for id in [&record.task_id, &record.depends_on_task_id] {
            if !self.tasks.task_exists(&record.scope, id).await? {
                return Ok(Some(id.clone()));
            }
        }
        Ok(None)
    }
}

fn rejection_error(rejection: EdgeRejection, task_id: &TaskId, depends_on_task_id: &TaskId) -> Error {
    match rejection {
        EdgeRejection::SelfLoop => Error::SelfDependency(task_id.clone()),
        EdgeRejection::Cycle => Error::CircularDependency {
            from: task_id.clone(),
            to: depends_on_task_id.clone(),
        },
        EdgeRejection::Duplicate => Error::DuplicateDependency {
            from: task_id.clone(),
            to: depends_on_task_id.clone(),
        },
    }
}
