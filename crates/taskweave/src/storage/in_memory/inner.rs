//! Core in-memory data structures, wrapped in `Arc<Mutex<_>>` by the caller.

use crate::domain::{Scope, Task, TaskId, TaskStatus};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Inner store state (not thread-safe on its own).
pub(crate) struct InMemoryStoreInner {
    /// Tasks indexed by id, across all scopes.
    pub(super) tasks: HashMap<TaskId, Task>,

    /// Latest creation timestamp handed out or imported.
    last_created_at: Option<DateTime<Utc>>,
}

impl InMemoryStoreInner {
    pub(crate) fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            last_created_at: None,
        }
    }

    /// A task visible in the scope.
    pub(super) fn scoped(&self, scope: &Scope, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id).filter(|task| task.in_scope(scope))
    }

    /// Mutable access to a task visible in the scope.
    pub(super) fn scoped_mut(&mut self, scope: &Scope, id: &TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(id).filter(|task| task.in_scope(scope))
    }

    /// Bottom of a status column: one past the current maximum, or 0.
    pub(super) fn next_position(&self, scope: &Scope, status: TaskStatus) -> u32 {
        self.tasks
            .values()
            .filter(|task| task.in_scope(scope) && task.status == status)
            .map(|task| task.position.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// A fresh id not yet used by any task.
    pub(super) fn generate_id(&self) -> TaskId {
        loop {
            let id = TaskId::generate();
            if !self.tasks.contains_key(&id) {
                return id;
            }
        }
    }

    /// Creation timestamp strictly after every earlier one.
    pub(super) fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(stamp);
        stamp
    }

    /// Insert or replace a task as-is (import path).
    pub(super) fn insert(&mut self, task: Task) {
        if self.last_created_at.is_none_or(|last| task.created_at > last) {
            self.last_created_at = Some(task.created_at);
        }
        self.tasks.insert(task.id.clone(), task);
    }
}
