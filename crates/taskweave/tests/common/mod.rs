//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use taskweave::domain::{NewTask, Scope, TaskId, TaskStatus, TaskUpdate};
use taskweave::storage::in_memory::new_in_memory_store;
use taskweave::storage::TaskStore;

/// The scope most tests run in.
pub fn scope() -> Scope {
    Scope::new("personal", "default").unwrap()
}

/// A second project for the same user.
pub fn other_scope() -> Scope {
    Scope::new("personal", "side-project").unwrap()
}

/// Fresh shared in-memory store.
pub fn shared_store() -> Arc<dyn TaskStore> {
    Arc::from(new_in_memory_store())
}

/// Create a `todo` task and return its id.
pub async fn create(store: &dyn TaskStore, scope: &Scope, title: &str) -> TaskId {
    store
        .create_task(scope, NewTask::titled(title))
        .await
        .unwrap()
        .id
}

/// Set a task's status directly in the store, bypassing any board rules.
pub async fn set_status(store: &dyn TaskStore, scope: &Scope, id: &TaskId, status: TaskStatus) {
    let update = TaskUpdate {
        status: Some(status),
        ..TaskUpdate::default()
    };
    store.update_task(scope, id, update).await.unwrap();
}
