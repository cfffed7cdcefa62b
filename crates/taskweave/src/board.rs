//! Board service: task CRUD with dependency rules applied.
//!
//! Two rules live here rather than in the graph:
//!
//! - A task may not move into `done` while any prerequisite is unfinished.
//! - Deleting a task prunes every edge that touches it.

use crate::domain::{
    DependencyEdge, DependencyStatus, NewTask, PositionUpdate, Scope, Task, TaskId, TaskStatus,
    TaskUpdate,
};
use crate::error::{Error, Result};
use crate::service::DependencyGraphService;
use crate::storage::TaskStore;
use std::sync::Arc;

/// Task operations for request handlers and the CLI.
pub struct Board {
    tasks: Arc<dyn TaskStore>,
    dependencies: DependencyGraphService,
}

impl Board {
    /// Create a board over a task store with an empty edge set.
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        let dependencies = DependencyGraphService::new(Arc::clone(&tasks));
        Self {
            tasks,
            dependencies,
        }
    }

    /// The underlying task store.
    pub fn tasks(&self) -> &Arc<dyn TaskStore> {
        &self.tasks
    }

    /// The dependency service.
    pub fn dependencies(&self) -> &DependencyGraphService {
        &self.dependencies
    }

    /// Create a task at the bottom of its column.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an invalid scope, title or description.
    pub async fn create_task(&self, scope: &Scope, new_task: NewTask) -> Result<Task> {
        self.tasks.create_task(scope, new_task).await
    }

    /// Fetch a task.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if the task is not in the scope.
    pub async fn get_task(&self, scope: &Scope, id: &TaskId) -> Result<Task> {
        self.tasks
            .get_task(scope, id)
            .await?
            .ok_or_else(|| Error::TaskNotFound(id.clone()))
    }

    /// Tasks in board order, optionally including archived ones.
    ///
    /// # Errors
    ///
    /// Returns a storage error if listing fails.
    pub async fn list_tasks(&self, scope: &Scope, include_archived: bool) -> Result<Vec<Task>> {
        let mut tasks = self.tasks.list_tasks(scope).await?;
        if !include_archived {
            tasks.retain(|task| !task.archived);
        }
        Ok(tasks)
    }

    /// Apply an update, refusing to finish a task with open prerequisites.
    ///
    /// A move into `done` is checked and written under the graph lock, so an
    /// edge added concurrently lands either before the check or after the
    /// write.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` for an empty or invalid update
    /// - `Error::TaskNotFound` if the task is not in the scope
    /// - `Error::DependenciesIncomplete` if the update moves the task into
    ///   `done` while a prerequisite is unfinished
    pub async fn update_task(&self, scope: &Scope, id: &TaskId, updates: TaskUpdate) -> Result<Task> {
        updates.validate().map_err(Error::Validation)?;

        let finishing: &[TaskId] = if updates.status == Some(TaskStatus::Done) {
            std::slice::from_ref(id)
        } else {
            &[]
        };
        let task = self
            .dependencies
            .gate_finishing(scope, finishing, || self.tasks.update_task(scope, id, updates))
            .await?;
        tracing::debug!(task_id = %task.id, %scope, status = %task.status, "Task updated");
        Ok(task)
    }

    /// Apply a batch of column moves.
    ///
    /// The whole batch is rejected if any move would put a task into `done`
    /// with unfinished prerequisites. The check and the batch write share one
    /// hold of the graph lock.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` if the batch is empty
    /// - `Error::TaskNotFound` if any task is not in the scope
    /// - `Error::DependenciesIncomplete` for the first blocked move
    pub async fn update_positions(&self, scope: &Scope, updates: &[PositionUpdate]) -> Result<usize> {
        let finishing: Vec<TaskId> = updates
            .iter()
            .filter(|update| update.status == TaskStatus::Done)
            .map(|update| update.id.clone())
            .collect();
        self.dependencies
            .gate_finishing(scope, &finishing, || self.tasks.update_positions(scope, updates))
            .await
    }

    /// Delete a task and every dependency edge touching it.
    ///
    /// Returns the number of edges pruned.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if the task is not in the scope.
    pub async fn delete_task(&self, scope: &Scope, id: &TaskId) -> Result<usize> {
        self.tasks.delete_task(scope, id).await?;
        // Any add_dependency racing with this delete either ran first and is
        // pruned here, or runs after and fails its existence check.
        let pruned = self.dependencies.prune_task(scope, id).await?;
        tracing::debug!(task_id = %id, %scope, pruned, "Task deleted");
        Ok(pruned)
    }

    /// See [`DependencyGraphService::add_dependency`].
    ///
    /// # Errors
    ///
    /// Propagates the service's errors.
    pub async fn add_dependency(
        &self,
        scope: &Scope,
        task_id: &TaskId,
        depends_on_task_id: &TaskId,
    ) -> Result<DependencyEdge> {
        self.dependencies
            .add_dependency(scope, task_id, depends_on_task_id)
            .await
    }

    /// See [`DependencyGraphService::remove_dependency`].
    ///
    /// # Errors
    ///
    /// Propagates the service's errors.
    pub async fn remove_dependency(
        &self,
        scope: &Scope,
        task_id: &TaskId,
        depends_on_task_id: &TaskId,
    ) -> Result<bool> {
        self.dependencies
            .remove_dependency(scope, task_id, depends_on_task_id)
            .await
    }

    /// See [`DependencyGraphService::get_dependencies`].
    ///
    /// # Errors
    ///
    /// Propagates the service's errors.
    pub async fn get_dependencies(&self, scope: &Scope, task_id: &TaskId) -> Result<Vec<Task>> {
        self.dependencies.get_dependencies(scope, task_id).await
    }

    /// See [`DependencyGraphService::get_dependents`].
    ///
    /// # Errors
    ///
    /// Propagates the service's errors.
    pub async fn get_dependents(&self, scope: &Scope, task_id: &TaskId) -> Result<Vec<Task>> {
        self.dependencies.get_dependents(scope, task_id).await
    }

    /// See [`DependencyGraphService::check_dependencies_complete`].
    ///
    /// # Errors
    ///
    /// Propagates the service's errors.
    pub async fn check_dependencies_complete(
        &self,
        scope: &Scope,
        task_id: &TaskId,
    ) -> Result<DependencyStatus> {
        self.dependencies
            .check_dependencies_complete(scope, task_id)
            .await
    }
}
