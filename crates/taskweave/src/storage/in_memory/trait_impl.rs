//! TaskStore trait implementation for in-memory storage.

use super::InMemoryStore;
use crate::domain::{NewTask, PositionUpdate, Scope, Task, TaskId, TaskUpdate};
use crate::error::{Error, Result};
use crate::storage::sorting::{board_order, creation_order};
use crate::storage::TaskStore;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn get_task(&self, scope: &Scope, id: &TaskId) -> Result<Option<Task>> {
        let inner = self.lock().await;
        Ok(inner.scoped(scope, id).cloned())
    }

    async fn list_tasks(&self, scope: &Scope) -> Result<Vec<Task>> {
        let inner = self.lock().await;

        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|task| task.in_scope(scope))
            .cloned()
            .collect();
        tasks.sort_by(board_order);

        Ok(tasks)
    }

    async fn create_task(&self, scope: &Scope, new_task: NewTask) -> Result<Task> {
        // === Phase 1: validation (no mutations) ===
        scope.validate().map_err(Error::Validation)?;
        new_task.validate().map_err(Error::Validation)?;

        let mut inner = self.lock().await;

        // === Phase 2: placement ===
        let id = inner.generate_id();
        let position = inner.next_position(scope, new_task.status);
        let created_at = inner.next_created_at();

        let task = Task {
            id: id.clone(),
            title: new_task.title.trim().to_string(),
            description: new_task.description,
            status: new_task.status,
            priority: new_task.priority,
            due_date: new_task.due_date,
            user_id: scope.user_id.clone(),
            project_id: scope.project_id.clone(),
            position,
            archived: false,
            created_at,
            updated_at: created_at,
        };

        inner.tasks.insert(id, task.clone());
        tracing::debug!(task_id = %task.id, %scope, position, "Task created");

        Ok(task)
    }

    async fn update_task(&self, scope: &Scope, id: &TaskId, updates: TaskUpdate) -> Result<Task> {
        updates.validate().map_err(Error::Validation)?;

        let mut inner = self.lock().await;
        let task = inner
            .scoped_mut(scope, id)
            .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

        if let Some(title) = updates.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = updates.description {
            task.description = description;
        }
        if let Some(status) = updates.status {
            task.status = status;
        }
        if let Some(priority) = updates.priority {
            task.priority = priority;
        }
        if let Some(due_date) = updates.due_date {
            task.due_date = due_date;
        }
        if let Some(position) = updates.position {
            task.position = position;
        }
        if let Some(archived) = updates.archived {
            task.archived = archived;
        }
        task.updated_at = Utc::now();

        Ok(task.clone())
    }

    async fn delete_task(&self, scope: &Scope, id: &TaskId) -> Result<()> {
        let mut inner = self.lock().await;

        if inner.scoped(scope, id).is_none() {
            return Err(Error::TaskNotFound(id.clone()));
        }
        inner.tasks.remove(id);
        tracing::debug!(task_id = %id, %scope, "Task deleted");

        Ok(())
    }

    async fn update_positions(&self, scope: &Scope, updates: &[PositionUpdate]) -> Result<usize> {
        if updates.is_empty() {
            return Err(Error::Validation("No updates provided".to_string()));
        }

        let mut inner = self.lock().await;

        // Check the whole batch first so a bad id leaves nothing half-moved.
        if let Some(missing) = updates
            .iter()
            .find(|update| inner.scoped(scope, &update.id).is_none())
        {
            return Err(Error::TaskNotFound(missing.id.clone()));
        }

        let now = Utc::now();
        for update in updates {
            if let Some(task) = inner.scoped_mut(scope, &update.id) {
                task.status = update.status;
                task.position = update.position;
                task.updated_at = now;
            }
        }

        Ok(updates.len())
    }

    async fn import_tasks(&self, tasks: Vec<Task>) -> Result<()> {
        let mut inner = self.lock().await;
        for task in tasks {
            inner.insert(task);
        }
        Ok(())
    }

    async fn export_all(&self) -> Result<Vec<Task>> {
        let inner = self.lock().await;
        let mut tasks: Vec<Task> = inner.tasks.values().cloned().collect();
        // Stable file order keeps diffs of tasks.jsonl small.
        tasks.sort_by(creation_order);
        Ok(tasks)
    }

    async fn save(&self) -> Result<()> {
        // Nothing to persist for in-memory storage
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        // No backing store to reload from
        Ok(())
    }
}
