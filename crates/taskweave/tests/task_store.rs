//! Integration tests for the in-memory task store through the `TaskStore` trait.

mod common;

use common::{create, other_scope, scope, shared_store};
use rstest::rstest;
use taskweave::domain::{NewTask, PositionUpdate, Scope, TaskId, TaskPriority, TaskStatus, TaskUpdate};
use taskweave::error::Error;

// ========== Create ==========

#[tokio::test]
async fn create_assigns_id_scope_and_defaults() {
    let store = shared_store();

    let task = store
        .create_task(&scope(), NewTask::titled("  Water plants  "))
        .await
        .unwrap();

    assert_eq!(task.title, "Water plants");
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert_eq!(task.user_id, "personal");
    assert_eq!(task.project_id, "default");
    assert!(!task.archived);
    assert_eq!(task.created_at, task.updated_at);
    assert!(TaskId::parse(task.id.as_str()).is_ok());
}

#[tokio::test]
async fn new_tasks_go_to_the_bottom_of_their_column() {
    let store = shared_store();
    let first = store
        .create_task(&scope(), NewTask::titled("First"))
        .await
        .unwrap();
    let second = store
        .create_task(&scope(), NewTask::titled("Second"))
        .await
        .unwrap();
    let done = store
        .create_task(
            &scope(),
            NewTask {
                status: TaskStatus::Done,
                ..NewTask::titled("Already finished")
            },
        )
        .await
        .unwrap();

    assert_eq!(first.position, 0);
    assert_eq!(second.position, 1);
    assert_eq!(done.position, 0);
}

#[tokio::test]
async fn creation_timestamps_strictly_increase() {
    let store = shared_store();
    let mut stamps = Vec::new();
    for i in 0..50 {
        let task = store
            .create_task(&scope(), NewTask::titled(format!("Task {i}")))
            .await
            .unwrap();
        stamps.push(task.created_at);
    }

    assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
}

#[rstest]
#[case::empty_title("   ")]
#[case::newline_title("first\nsecond")]
#[tokio::test]
async fn create_rejects_invalid_title(#[case] title: &str) {
    let store = shared_store();

    let err = store
        .create_task(&scope(), NewTask::titled(title))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "validation");
    assert!(store.list_tasks(&scope()).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_overlong_title() {
    let store = shared_store();

    let err = store
        .create_task(&scope(), NewTask::titled("x".repeat(201)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn create_rejects_invalid_scope() {
    let store = shared_store();
    let bad = Scope {
        user_id: "personal".to_string(),
        project_id: "  ".to_string(),
    };

    let err = store
        .create_task(&bad, NewTask::titled("Orphan"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "validation");
}

// ========== Scope isolation ==========

#[tokio::test]
async fn tasks_are_invisible_outside_their_scope() {
    let store = shared_store();
    let id = create(store.as_ref(), &scope(), "Private").await;

    assert!(store.get_task(&other_scope(), &id).await.unwrap().is_none());
    assert!(!store.task_exists(&other_scope(), &id).await.unwrap());
    assert!(store.list_tasks(&other_scope()).await.unwrap().is_empty());

    let err = store.delete_task(&other_scope(), &id).await.unwrap_err();
    assert!(matches!(err, Error::TaskNotFound(_)));
    assert!(store.task_exists(&scope(), &id).await.unwrap());
}

// ========== Update ==========

#[tokio::test]
async fn update_applies_only_given_fields() {
    let store = shared_store();
    let id = create(store.as_ref(), &scope(), "Original").await;
    let due = chrono::NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();

    let task = store
        .update_task(
            &scope(),
            &id,
            TaskUpdate {
                priority: Some(TaskPriority::High),
                due_date: Some(Some(due)),
                ..TaskUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(task.title, "Original");
    assert_eq!(task.priority, TaskPriority::High);
    assert_eq!(task.due_date, Some(due));
    assert!(task.updated_at >= task.created_at);

    let cleared = store
        .update_task(
            &scope(),
            &id,
            TaskUpdate {
                due_date: Some(None),
                ..TaskUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.due_date, None);
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let store = shared_store();
    let id = create(store.as_ref(), &scope(), "Task").await;

    let err = store
        .update_task(&scope(), &id, TaskUpdate::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(ref msg) if msg.contains("No fields")));
}

#[tokio::test]
async fn update_of_missing_task_is_not_found() {
    let store = shared_store();
    let update = TaskUpdate {
        title: Some("New".to_string()),
        ..TaskUpdate::default()
    };

    let err = store
        .update_task(&scope(), &TaskId::generate(), update)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn archived_tasks_keep_status() {
    let store = shared_store();
    let id = create(store.as_ref(), &scope(), "Old").await;

    let task = store
        .update_task(
            &scope(),
            &id,
            TaskUpdate {
                archived: Some(true),
                ..TaskUpdate::default()
            },
        )
        .await
        .unwrap();

    assert!(task.archived);
    assert_eq!(store.task_status(&scope(), &id).await.unwrap(), Some(TaskStatus::Todo));
}

// ========== Positions ==========

#[tokio::test]
async fn update_positions_moves_tasks_between_columns() {
    let store = shared_store();
    let a = create(store.as_ref(), &scope(), "A").await;
    let b = create(store.as_ref(), &scope(), "B").await;

    let applied = store
        .update_positions(
            &scope(),
            &[
                PositionUpdate {
                    id: a.clone(),
                    status: TaskStatus::InProgress,
                    position: 0,
                },
                PositionUpdate {
                    id: b.clone(),
                    status: TaskStatus::Todo,
                    position: 0,
                },
            ],
        )
        .await
        .unwrap();

    assert_eq!(applied, 2);
    let a = store.get_task(&scope(), &a).await.unwrap().unwrap();
    let b = store.get_task(&scope(), &b).await.unwrap().unwrap();
    assert_eq!((a.status, a.position), (TaskStatus::InProgress, 0));
    assert_eq!((b.status, b.position), (TaskStatus::Todo, 0));
}

#[tokio::test]
async fn update_positions_is_all_or_nothing() {
    let store = shared_store();
    let a = create(store.as_ref(), &scope(), "A").await;
    let missing = TaskId::generate();

    let err = store
        .update_positions(
            &scope(),
            &[
                PositionUpdate {
                    id: a.clone(),
                    status: TaskStatus::Done,
                    position: 4,
                },
                PositionUpdate {
                    id: missing.clone(),
                    status: TaskStatus::Done,
                    position: 5,
                },
            ],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::TaskNotFound(ref id) if *id == missing));
    let a = store.get_task(&scope(), &a).await.unwrap().unwrap();
    assert_eq!((a.status, a.position), (TaskStatus::Todo, 0));
}

#[tokio::test]
async fn empty_position_batch_is_rejected() {
    let store = shared_store();

    let err = store.update_positions(&scope(), &[]).await.unwrap_err();

    assert_eq!(err.kind(), "validation");
}

#[tokio::test]
async fn list_is_in_board_order() {
    let store = shared_store();
    let first = create(store.as_ref(), &scope(), "First").await;
    let second = create(store.as_ref(), &scope(), "Second").await;
    store
        .update_positions(
            &scope(),
            &[
                PositionUpdate {
                    id: first.clone(),
                    status: TaskStatus::Todo,
                    position: 1,
                },
                PositionUpdate {
                    id: second.clone(),
                    status: TaskStatus::Todo,
                    position: 0,
                },
            ],
        )
        .await
        .unwrap();

    let ids: Vec<TaskId> = store
        .list_tasks(&scope())
        .await
        .unwrap()
        .into_iter()
        .map(|task| task.id)
        .collect();

    assert_eq!(ids, vec![second, first]);
}

// ========== Delete ==========

#[tokio::test]
async fn delete_removes_the_task() {
    let store = shared_store();
    let id = create(store.as_ref(), &scope(), "Temporary").await;

    store.delete_task(&scope(), &id).await.unwrap();

    assert!(store.get_task(&scope(), &id).await.unwrap().is_none());
    let err = store.delete_task(&scope(), &id).await.unwrap_err();
    assert!(matches!(err, Error::TaskNotFound(_)));
}

#[tokio::test]
async fn export_covers_every_scope_in_creation_order() {
    let store = shared_store();
    let a = create(store.as_ref(), &scope(), "A").await;
    let b = create(store.as_ref(), &other_scope(), "B").await;
    let c = create(store.as_ref(), &scope(), "C").await;

    let ids: Vec<TaskId> = store
        .export_all()
        .await
        .unwrap()
        .into_iter()
        .map(|task| task.id)
        .collect();

    assert_eq!(ids, vec![a, b, c]);
}
