//! Command execution logic.
//!
//! Every mutating command saves the workspace before printing its result.

use anyhow::Result;
use chrono::NaiveDate;

use super::args::{
    CreateArgs, DeleteArgs, DepAction, DepArgs, InfoArgs, InitArgs, ListArgs, MoveArgs, ShowArgs,
    UpdateArgs,
};
use crate::app::App;
use crate::domain::{
    NewTask, PositionUpdate, Scope, Task, TaskId, TaskPriority, TaskStatus, TaskUpdate,
};
use crate::output::{self, OutputMode};

/// Execute the init command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;

    if !args.quiet {
        println!("Initializing taskweave workspace...");
    }

    let result = init::init(
        &current_dir,
        args.user.as_deref(),
        args.default_project.as_deref(),
    )
    .await?;

    if !args.quiet {
        println!("Initialized taskweave in {}", result.workspace_dir.display());
        println!("  Config:       {}", result.config_file.display());
        println!("  Tasks:        {}", result.tasks_file.display());
        println!("  Dependencies: {}", result.dependencies_file.display());
        println!("  User:         {}", result.user_id);
        println!("  Project:      {}", result.default_project);
    }

    Ok(())
}

/// Execute the info command
pub async fn execute_info(
    app: &App,
    scope: &Scope,
    _args: &InfoArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let tasks = app.board().list_tasks(scope, true).await?;
    let (todo, in_progress, done, archived) =
        tasks
            .iter()
            .fold((0, 0, 0, 0), |(t, ip, d, a), task| {
                let a = a + usize::from(task.archived);
                match task.status {
                    TaskStatus::Todo => (t + 1, ip, d, a),
                    TaskStatus::InProgress => (t, ip + 1, d, a),
                    TaskStatus::Done => (t, ip, d + 1, a),
                }
            });
    let edge_count = app.board().dependencies().edge_count(scope).await?;
    let config = app.config();

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "workspace": app.workspace_dir().display().to_string(),
                "user_id": config.user_id,
                "project_id": scope.project_id,
                "backend": config.storage.backend,
                "tasks": {
                    "total": tasks.len(),
                    "todo": todo,
                    "in_progress": in_progress,
                    "done": done,
                    "archived": archived
                },
                "dependencies": edge_count
            }))?;
        }
        OutputMode::Text => {
            println!("Taskweave Workspace Information");
            println!("===============================");
            println!();
            println!("Workspace: {}", app.workspace_dir().display());
            println!("User:      {}", config.user_id);
            println!("Project:   {}", scope.project_id);
            println!("Backend:   {}", config.storage.backend);
            println!();
            println!(
                "Tasks: {} total ({} todo, {} in progress, {} done, {} archived)",
                tasks.len(),
                todo,
                in_progress,
                done,
                archived
            );
            println!("Dependencies: {edge_count}");
        }
    }

    Ok(())
}

/// Execute the create command
///
/// If any `--depends-on` edge is rejected the new task is deleted again, so
/// a failed create leaves nothing behind.
pub async fn execute_create(
    app: &App,
    scope: &Scope,
    args: &CreateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let board = app.board();

    let new_task = NewTask {
        title: args.title.clone(),
        description: args.description.clone().unwrap_or_default(),
        status: args.status.into(),
        priority: args.priority.into(),
        due_date: args.due,
    };
    let task = board.create_task(scope, new_task).await?;

    for prerequisite in &args.depends_on {
        if let Err(e) = board.add_dependency(scope, &task.id, prerequisite).await {
            board.delete_task(scope, &task.id).await?;
            return Err(e.into());
        }
    }
    if task.status == TaskStatus::Done && !args.depends_on.is_empty() {
        let status = board.check_dependencies_complete(scope, &task.id).await?;
        if !status.complete {
            board.delete_task(scope, &task.id).await?;
            return Err(crate::error::Error::DependenciesIncomplete {
                task_id: task.id,
                total: status.total,
                completed: status.completed,
            }
            .into());
        }
    }

    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_task(&task, output_mode)?,
        OutputMode::Text => {
            println!("Created task: {}", task.id);
            output::print_task(&task, output_mode)?;
        }
    }

    Ok(())
}

/// Execute the list command
pub async fn execute_list(
    app: &App,
    scope: &Scope,
    args: &ListArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let filter = ListFilter {
        status: args.status.map(Into::into),
        priority: args.priority.map(Into::into),
        due_on: args
            .due_today
            .then(|| chrono::Local::now().date_naive()),
    };

    let tasks: Vec<_> = app
        .board()
        .list_tasks(scope, args.all)
        .await?
        .into_iter()
        .filter(|task| filter.keeps(task))
        .collect();

    output::print_tasks(&tasks, output_mode)?;
    Ok(())
}

/// Execute the show command
pub async fn execute_show(
    app: &App,
    scope: &Scope,
    args: &ShowArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let board = app.board();
    let task = board.get_task(scope, &args.task_id).await?;
    let dependencies = board.get_dependencies(scope, &task.id).await?;
    let dependents = board.get_dependents(scope, &task.id).await?;
    let status = board.check_dependencies_complete(scope, &task.id).await?;

    output::print_task_details(&task, &dependencies, &dependents, status, output_mode)?;
    Ok(())
}

/// Execute the update command
pub async fn execute_update(
    app: &App,
    scope: &Scope,
    args: &UpdateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let due_date = if args.clear_due {
        Some(None)
    } else {
        args.due.map(Some)
    };
    let archived = match (args.archive, args.unarchive) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };

    let updates = TaskUpdate {
        title: args.title.clone(),
        description: args.description.clone(),
        status: args.status.map(Into::into),
        priority: args.priority.map(Into::into),
        due_date,
        position: None,
        archived,
    };

    let task = app.board().update_task(scope, &args.task_id, updates).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_task(&task, output_mode)?,
        OutputMode::Text => {
            println!("Updated task: {}", task.id);
            output::print_task(&task, output_mode)?;
        }
    }

    Ok(())
}

/// Execute the move command
pub async fn execute_move(
    app: &App,
    scope: &Scope,
    args: &MoveArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let board = app.board();
    let status: TaskStatus = args.status.into();

    let position = match args.position {
        Some(position) => position,
        None => bottom_of_column(&board.list_tasks(scope, true).await?, status, &args.task_id),
    };

    let update = PositionUpdate {
        id: args.task_id.clone(),
        status,
        position,
    };
    board.update_positions(scope, &[update]).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "moved": args.task_id,
                "status": status,
                "position": position
            }))?;
        }
        OutputMode::Text => {
            println!("Moved {} to {} at position {}", args.task_id, status, position);
        }
    }

    Ok(())
}

/// Execute the delete command
pub async fn execute_delete(
    app: &App,
    scope: &Scope,
    args: &DeleteArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let board = app.board();
    let task = board.get_task(scope, &args.task_id).await?;

    if !args.force {
        eprint!("Delete task '{}' ({})? [y/N]: ", task.id, task.title);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let response = input.trim().to_lowercase();
        if response != "y" && response != "yes" {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let pruned = board.delete_task(scope, &task.id).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "deleted": task.id,
                "dependencies_removed": pruned,
                "status": "success"
            }))?;
        }
        OutputMode::Text => {
            println!("Deleted task: {}", task.id);
            if pruned > 0 {
                println!("  Removed {pruned} dependenc{}", if pruned == 1 { "y" } else { "ies" });
            }
        }
    }

    Ok(())
}

/// Execute the dep command
pub async fn execute_dep(
    app: &App,
    scope: &Scope,
    args: &DepArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let board = app.board();

    match &args.action {
        DepAction::Add { task, depends_on } => {
            let edge = board.add_dependency(scope, task, depends_on).await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&edge)?,
                OutputMode::Text => println!("Added dependency: {task} --> {depends_on}"),
            }
        }
        DepAction::Remove { task, depends_on } => {
            let removed = board.remove_dependency(scope, task, depends_on).await?;
            if removed {
                app.save().await?;
            }

            match output_mode {
                OutputMode::Json => {
                    output::print_json(&serde_json::json!({
                        "task_id": task,
                        "depends_on_task_id": depends_on,
                        "removed": removed
                    }))?;
                }
                OutputMode::Text if removed => {
                    println!("Removed dependency: {task} --> {depends_on}");
                }
                OutputMode::Text => {
                    println!("No dependency {task} --> {depends_on}; nothing to remove");
                }
            }
        }
        DepAction::List { task, reverse } => {
            board.get_task(scope, task).await?;
            let tasks = if *reverse {
                board.get_dependents(scope, task).await?
            } else {
                board.get_dependencies(scope, task).await?
            };
            output::print_dependency_list(task, &tasks, *reverse, output_mode)?;
        }
        DepAction::Check { task } => {
            board.get_task(scope, task).await?;
            let status = board.check_dependencies_complete(scope, task).await?;
            output::print_dependency_status(task, status, output_mode)?;
        }
    }

    Ok(())
}

/// Narrowing applied by `list` on top of the archived filter.
#[derive(Debug, Default)]
struct ListFilter {
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    due_on: Option<NaiveDate>,
}

impl ListFilter {
    fn keeps(&self, task: &Task) -> bool {
        self.status.is_none_or(|s| task.status == s)
            && self.priority.is_none_or(|p| task.priority == p)
            && self.due_on.is_none_or(|day| task.due_date == Some(day))
    }
}

/// First free position below every other task in the column.
fn bottom_of_column(tasks: &[Task], status: TaskStatus, moving: &TaskId) -> u32 {
    tasks
        .iter()
        .filter(|task| task.status == status && task.id != *moving)
        .map(|task| task.position.saturating_add(1))
        .max()
        .unwrap_or(0)
}
