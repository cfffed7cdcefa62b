//! JSON output for programmatic use.

use crate::domain::{DependencyStatus, Task, TaskId};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct TaskDetailsJson<'a> {
    #[serde(flatten)]
    task: &'a Task,
    dependencies: &'a [Task],
    dependents: &'a [Task],
    dependency_status: DependencyStatus,
}

#[derive(Serialize)]
struct DependencyListJson<'a> {
    task_id: &'a TaskId,
    direction: &'static str,
    tasks: &'a [Task],
}

#[derive(Serialize)]
struct DependencyStatusJson<'a> {
    task_id: &'a TaskId,
    #[serde(flatten)]
    status: DependencyStatus,
}

fn write_pretty<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w)
}

pub(super) fn print_task_json<W: Write>(w: &mut W, task: &Task) -> io::Result<()> {
    write_pretty(w, task)
}

pub(super) fn print_tasks_json<W: Write>(w: &mut W, tasks: &[Task]) -> io::Result<()> {
    write_pretty(w, tasks)
}

pub(super) fn print_task_details_json<W: Write>(
    w: &mut W,
    task: &Task,
    dependencies: &[Task],
    dependents: &[Task],
    dependency_status: DependencyStatus,
) -> io::Result<()> {
    write_pretty(
        w,
        &TaskDetailsJson {
            task,
            dependencies,
            dependents,
            dependency_status,
        },
    )
}

pub(super) fn print_dependency_list_json<W: Write>(
    w: &mut W,
    task_id: &TaskId,
    tasks: &[Task],
    reverse: bool,
) -> io::Result<()> {
    write_pretty(
        w,
        &DependencyListJson {
            task_id,
            direction: if reverse { "dependents" } else { "dependencies" },
            tasks,
        },
    )
}

pub(super) fn print_dependency_status_json<W: Write>(
    w: &mut W,
    task_id: &TaskId,
    status: DependencyStatus,
) -> io::Result<()> {
    write_pretty(w, &DependencyStatusJson { task_id, status })
}
