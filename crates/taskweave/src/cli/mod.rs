//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `init`: Initialize a new workspace
//! - `info`: Show workspace information
//! - `create`: Create a new task
//! - `list`: List tasks grouped by column
//! - `show`: Show a task with its dependencies
//! - `update`: Update fields of a task
//! - `move`: Move a task to a column and position
//! - `delete`: Delete a task and its dependencies
//! - `dep`: Add, remove, list and check dependencies
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--project`: Project to operate on (defaults to the configured one)
//!
//! # Example
//!
//! ```bash
//! taskweave create "Design schema" --priority high
//! taskweave dep add <build-id> <design-id>
//! taskweave dep check <build-id>
//! taskweave update <build-id> --status done
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{
    CreateArgs, DeleteArgs, DepAction, DepArgs, InfoArgs, InitArgs, ListArgs, MoveArgs, ShowArgs,
    UpdateArgs,
};
pub use types::{TaskPriorityArg, TaskStatusArg};

/// Taskweave - personal task board with task dependencies
///
/// Tasks are stored in `.taskweave/tasks.jsonl` and dependencies in
/// `.taskweave/dependencies.jsonl`.
#[derive(Parser, Debug)]
#[command(name = "taskweave")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Project to operate on (defaults to `default-project` from config)
    #[arg(long, global = true, value_parser = validators::validate_name)]
    pub project: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new taskweave workspace
    ///
    /// Creates the `.taskweave/` directory with configuration and empty data
    /// files. Run this once in your project root.
    Init(InitArgs),

    /// Show workspace information
    Info(InfoArgs),

    /// Create a new task
    ///
    /// The task is placed at the bottom of its status column.
    Create(CreateArgs),

    /// List tasks grouped by status column
    List(ListArgs),

    /// Show a task with its dependencies and dependents
    Show(ShowArgs),

    /// Update an existing task
    ///
    /// Only provided fields are changed. Setting the status to done is
    /// refused while any prerequisite is unfinished.
    Update(UpdateArgs),

    /// Move a task to a column and position
    Move(MoveArgs),

    /// Delete a task permanently
    ///
    /// Also removes every dependency touching the task.
    Delete(DeleteArgs),

    /// Manage task dependencies
    Dep(DepArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Taskweave task board");
            println!("Use --help for more information");
            return Ok(());
        };

        if let Commands::Init(args) = command {
            return execute::execute_init(args).await;
        }

        let app = App::from_directory(&std::env::current_dir()?).await?;
        let scope = app.scope(self.project.as_deref())?;

        match command {
            Commands::Init(_) => Ok(()),
            Commands::Info(args) => execute::execute_info(&app, &scope, args, output_mode).await,
            Commands::Create(args) => execute::execute_create(&app, &scope, args, output_mode).await,
            Commands::List(args) => execute::execute_list(&app, &scope, args, output_mode).await,
            Commands::Show(args) => execute::execute_show(&app, &scope, args, output_mode).await,
            Commands::Update(args) => execute::execute_update(&app, &scope, args, output_mode).await,
            Commands::Move(args) => execute::execute_move(&app, &scope, args, output_mode).await,
            Commands::Delete(args) => execute::execute_delete(&app, &scope, args, output_mode).await,
            Commands::Dep(args) => execute::execute_dep(&app, &scope, args, output_mode).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";
    const ID_B: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

    // ========== CLI Parsing Tests ==========

    #[test]
    fn parse_no_command() {
        let cli = Cli::try_parse_from(["taskweave"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert!(cli.project.is_none());
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["taskweave", "list", "--json", "--project", "garden"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.project.as_deref(), Some("garden"));
        assert!(matches!(cli.command, Some(Commands::List(_))));
    }

    #[test]
    fn parse_list_due_today() {
        let cli = Cli::try_parse_from(["taskweave", "list", "--due-today", "-s", "todo"]).unwrap();
        match cli.command {
            Some(Commands::List(args)) => {
                assert!(args.due_today);
                assert!(!args.all);
                assert!(args.status.is_some());
            }
            _ => panic!("Expected List command"),
        }

        let cli = Cli::try_parse_from(["taskweave", "list"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List(args)) if !args.due_today));
    }

    #[test]
    fn parse_rejects_invalid_project() {
        assert!(Cli::try_parse_from(["taskweave", "--project", "a b", "list"]).is_err());
    }

    #[test]
    fn parse_init_with_names() {
        let cli =
            Cli::try_parse_from(["taskweave", "init", "--user", "alice", "-P", "garden"]).unwrap();
        match cli.command {
            Some(Commands::Init(args)) => {
                assert_eq!(args.user.as_deref(), Some("alice"));
                assert_eq!(args.default_project.as_deref(), Some("garden"));
                assert!(!args.quiet);
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn parse_create_defaults() {
        let cli = Cli::try_parse_from(["taskweave", "create", "Write docs"]).unwrap();
        match cli.command {
            Some(Commands::Create(args)) => {
                assert_eq!(args.title, "Write docs");
                assert_eq!(args.status, TaskStatusArg::Todo);
                assert_eq!(args.priority, TaskPriorityArg::Medium);
                assert!(args.depends_on.is_empty());
                assert!(args.due.is_none());
            }
            _ => panic!("Expected Create command"),
        }
    }

    #[test]
    fn parse_create_with_dependencies() {
        let deps = format!("{ID_A},{ID_B}");
        let cli = Cli::try_parse_from([
            "taskweave",
            "create",
            "Build",
            "--depends-on",
            &deps,
            "--due",
            "2025-06-30",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Create(args)) => {
                assert_eq!(args.depends_on.len(), 2);
                assert_eq!(args.depends_on[0].as_str(), ID_A);
                assert!(args.due.is_some());
            }
            _ => panic!("Expected Create command"),
        }
    }

    #[test]
    fn parse_create_rejects_empty_title() {
        assert!(Cli::try_parse_from(["taskweave", "create", "   "]).is_err());
    }

    #[test]
    fn parse_update_status_alias() {
        let cli =
            Cli::try_parse_from(["taskweave", "update", ID_A, "--status", "in-progress"]).unwrap();
        match cli.command {
            Some(Commands::Update(args)) => {
                assert_eq!(args.status, Some(TaskStatusArg::InProgress));
            }
            _ => panic!("Expected Update command"),
        }
    }

    #[test]
    fn parse_update_due_conflicts_with_clear_due() {
        let result = Cli::try_parse_from([
            "taskweave",
            "update",
            ID_A,
            "--due",
            "2025-01-01",
            "--clear-due",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_move() {
        let cli = Cli::try_parse_from(["taskweave", "move", ID_A, "done", "--position", "3"]).unwrap();
        match cli.command {
            Some(Commands::Move(args)) => {
                assert_eq!(args.status, TaskStatusArg::Done);
                assert_eq!(args.position, Some(3));
            }
            _ => panic!("Expected Move command"),
        }
    }

    #[test]
    fn parse_rejects_malformed_task_id() {
        assert!(Cli::try_parse_from(["taskweave", "show", "task-1"]).is_err());
    }

    #[test]
    fn parse_dep_add() {
        let cli = Cli::try_parse_from(["taskweave", "dep", "add", ID_A, ID_B]).unwrap();
        match cli.command {
            Some(Commands::Dep(DepArgs {
                action: DepAction::Add { task, depends_on },
            })) => {
                assert_eq!(task.as_str(), ID_A);
                assert_eq!(depends_on.as_str(), ID_B);
            }
            _ => panic!("Expected Dep Add command"),
        }
    }

    #[test]
    fn parse_dep_list_reverse() {
        let cli = Cli::try_parse_from(["taskweave", "dep", "list", ID_A, "--reverse"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Dep(DepArgs {
                action: DepAction::List { reverse: true, .. }
            }))
        ));
    }

    #[test]
    fn parse_dep_check() {
        let cli = Cli::try_parse_from(["taskweave", "--json", "dep", "check", ID_A]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Some(Commands::Dep(DepArgs {
                action: DepAction::Check { .. }
            }))
        ));
    }
}
