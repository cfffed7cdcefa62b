//! CLI argument structs for all commands.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use super::types::{TaskPriorityArg, TaskStatusArg};
use super::validators::{
    validate_description, validate_due_date, validate_name, validate_task_id, validate_title,
};
use crate::domain::TaskId;

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// User id that owns every task in this workspace
    #[arg(short, long, value_parser = validate_name)]
    pub user: Option<String>,

    /// Project used when `--project` is not given
    #[arg(short = 'P', long = "default-project", value_parser = validate_name)]
    pub default_project: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug, Clone, Default)]
pub struct InfoArgs {}

/// Arguments for the `create` command
#[derive(Parser, Debug, Clone)]
pub struct CreateArgs {
    /// Task title (maximum 200 characters)
    #[arg(value_parser = validate_title)]
    pub title: String,

    /// Detailed description
    #[arg(short = 'D', long, value_parser = validate_description)]
    pub description: Option<String>,

    /// Initial status column
    #[arg(short, long, value_enum, default_value = "todo")]
    pub status: TaskStatusArg,

    /// Priority
    #[arg(short, long, value_enum, default_value = "medium")]
    pub priority: TaskPriorityArg,

    /// Due date (YYYY-MM-DD)
    #[arg(long, value_parser = validate_due_date)]
    pub due: Option<NaiveDate>,

    /// Prerequisites (comma-separated task IDs)
    #[arg(long, value_delimiter = ',', value_parser = validate_task_id)]
    pub depends_on: Vec<TaskId>,
}

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Filter by status
    #[arg(short, long, value_enum)]
    pub status: Option<TaskStatusArg>,

    /// Filter by priority
    #[arg(short, long, value_enum)]
    pub priority: Option<TaskPriorityArg>,

    /// Include archived tasks
    #[arg(short, long)]
    pub all: bool,

    /// Only tasks due today (local date)
    #[arg(long)]
    pub due_today: bool,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Task ID to display
    #[arg(value_parser = validate_task_id)]
    pub task_id: TaskId,
}

/// Arguments for the `update` command
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Task ID to update
    #[arg(value_parser = validate_task_id)]
    pub task_id: TaskId,

    /// New title (maximum 200 characters)
    #[arg(long, value_parser = validate_title)]
    pub title: Option<String>,

    /// New description
    #[arg(short = 'D', long, value_parser = validate_description)]
    pub description: Option<String>,

    /// New status (moving to done requires every prerequisite done)
    #[arg(short, long, value_enum)]
    pub status: Option<TaskStatusArg>,

    /// New priority
    #[arg(short, long, value_enum)]
    pub priority: Option<TaskPriorityArg>,

    /// New due date (YYYY-MM-DD)
    #[arg(long, value_parser = validate_due_date, conflicts_with = "clear_due")]
    pub due: Option<NaiveDate>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,

    /// Archive the task
    #[arg(long, conflicts_with = "unarchive")]
    pub archive: bool,

    /// Unarchive the task
    #[arg(long)]
    pub unarchive: bool,
}

/// Arguments for the `move` command
#[derive(Parser, Debug, Clone)]
pub struct MoveArgs {
    /// Task ID to move
    #[arg(value_parser = validate_task_id)]
    pub task_id: TaskId,

    /// Destination column
    #[arg(value_enum)]
    pub status: TaskStatusArg,

    /// Position within the column (0 = top); defaults to the bottom
    #[arg(long)]
    pub position: Option<u32>,
}

/// Arguments for the `delete` command
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Task ID to delete
    #[arg(value_parser = validate_task_id)]
    pub task_id: TaskId,

    /// Confirm deletion (also removes the task's dependencies)
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `dep` command
#[derive(Parser, Debug, Clone)]
pub struct DepArgs {
    /// Dependency subcommand
    #[command(subcommand)]
    pub action: DepAction,
}

/// Dependency management actions
#[derive(Subcommand, Debug, Clone)]
pub enum DepAction {
    /// Record that a task depends on another
    Add {
        /// Task that depends on another
        #[arg(value_parser = validate_task_id)]
        task: TaskId,

        /// Task that must be done first
        #[arg(value_parser = validate_task_id)]
        depends_on: TaskId,
    },

    /// Remove a dependency (no-op if absent)
    Remove {
        /// Task that depends on another
        #[arg(value_parser = validate_task_id)]
        task: TaskId,

        /// Task being depended on
        #[arg(value_parser = validate_task_id)]
        depends_on: TaskId,
    },

    /// List dependencies of a task
    List {
        /// Task ID
        #[arg(value_parser = validate_task_id)]
        task: TaskId,

        /// Show dependents (tasks that depend on this one) instead
        #[arg(short, long)]
        reverse: bool,
    },

    /// Check whether every prerequisite of a task is done
    Check {
        /// Task ID
        #[arg(value_parser = validate_task_id)]
        task: TaskId,
    },
}
