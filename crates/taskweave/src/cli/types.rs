//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use crate::domain::{TaskPriority, TaskStatus};

/// Task status for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatusArg {
    /// Not started
    Todo,
    /// Currently being worked on
    #[value(name = "in_progress", alias = "in-progress")]
    InProgress,
    /// Finished
    Done,
}

impl std::fmt::Display for TaskStatusArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        TaskStatus::from(*self).fmt(f)
    }
}

impl From<TaskStatusArg> for TaskStatus {
    fn from(arg: TaskStatusArg) -> Self {
        match arg {
            TaskStatusArg::Todo => TaskStatus::Todo,
            TaskStatusArg::InProgress => TaskStatus::InProgress,
            TaskStatusArg::Done => TaskStatus::Done,
        }
    }
}

/// Task priority for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPriorityArg {
    /// Nice to have
    Low,
    /// Default
    Medium,
    /// Important
    High,
    /// Drop everything
    Critical,
}

impl std::fmt::Display for TaskPriorityArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        TaskPriority::from(*self).fmt(f)
    }
}

impl From<TaskPriorityArg> for TaskPriority {
    fn from(arg: TaskPriorityArg) -> Self {
        match arg {
            TaskPriorityArg::Low => TaskPriority::Low,
            TaskPriorityArg::Medium => TaskPriority::Medium,
            TaskPriorityArg::High => TaskPriority::High,
            TaskPriorityArg::Critical => TaskPriority::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::todo(TaskStatusArg::Todo, TaskStatus::Todo)]
    #[case::in_progress(TaskStatusArg::InProgress, TaskStatus::InProgress)]
    #[case::done(TaskStatusArg::Done, TaskStatus::Done)]
    fn status_arg_converts(#[case] arg: TaskStatusArg, #[case] expected: TaskStatus) {
        assert_eq!(TaskStatus::from(arg), expected);
        assert_eq!(arg.to_string(), expected.to_string());
    }

    #[test]
    fn priority_arg_converts() {
        assert_eq!(TaskPriority::from(TaskPriorityArg::Critical), TaskPriority::Critical);
        assert_eq!(TaskPriorityArg::Low.to_string(), "low");
    }
}
