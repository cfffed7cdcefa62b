//! Output formatting for CLI commands.
//!
//! Every command renders either human-readable text or JSON. Text output
//! honors `NO_COLOR`, `TASKWEAVE_COLOR`, `TASKWEAVE_ASCII` and
//! `TASKWEAVE_MAX_WIDTH`.

pub mod color;
mod json;

use crate::domain::{DependencyStatus, Task, TaskId, TaskStatus};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{success, warning};

use json::{
    print_dependency_list_json, print_dependency_status_json, print_task_details_json,
    print_task_json, print_tasks_json,
};

/// Fallback width when no terminal is attached.
const FALLBACK_TERMINAL_WIDTH: usize = 80;

/// Default cap on wrapped description width.
const DEFAULT_MAX_WIDTH: usize = 80;

/// Rendering options for text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Wrap descriptions at this many columns (or the terminal width, if narrower).
    pub max_width: usize,
    /// Use `o > +` instead of Unicode status icons.
    pub use_ascii: bool,
    /// Emit ANSI colors.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Explicit options, for tests and embedding.
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Build from the environment.
    ///
    /// | Variable              | Effect                                 |
    /// |-----------------------|----------------------------------------|
    /// | `TASKWEAVE_MAX_WIDTH` | wrap width, default 80                 |
    /// | `TASKWEAVE_ASCII`     | `1`/`true` for ASCII icons             |
    /// | `NO_COLOR`            | any value disables colors              |
    /// | `TASKWEAVE_COLOR`     | `0`/`false` disables colors            |
    ///
    /// Unparseable values are logged and replaced by the default.
    pub fn from_env() -> Self {
        let max_width = env_value("TASKWEAVE_MAX_WIDTH")
            .and_then(|raw| match raw.parse::<usize>() {
                Ok(width) => Some(width),
                Err(_) => {
                    tracing::warn!(var = "TASKWEAVE_MAX_WIDTH", value = %raw, "Ignoring non-numeric width");
                    None
                }
            })
            .unwrap_or(DEFAULT_MAX_WIDTH);

        let use_ascii = env_flag("TASKWEAVE_ASCII").unwrap_or(false);

        // https://no-color.org/
        let use_colors =
            env::var_os("NO_COLOR").is_none() && env_flag("TASKWEAVE_COLOR").unwrap_or(true);

        Self::new(max_width, use_ascii, use_colors)
    }
}

/// A set, non-empty environment variable.
fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

/// A boolean environment variable; `None` when unset or unrecognized.
fn env_flag(name: &str) -> Option<bool> {
    let raw = env_value(name)?;
    match parse_flag(&raw) {
        Some(flag) => Some(flag),
        None => {
            tracing::warn!(var = name, value = %raw, "Ignoring value, expected 1/0/true/false");
            None
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    if raw == "1" || raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(width, _)| usize::from(width.0))
        .unwrap_or(FALLBACK_TERMINAL_WIDTH)
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Render to a locked stdout with the environment's text options.
fn emit<F>(render: F) -> io::Result<()>
where
    F: FnOnce(&mut io::StdoutLock<'static>, &OutputConfig) -> io::Result<()>,
{
    let mut out = io::stdout().lock();
    render(&mut out, &OutputConfig::from_env())
}

/// Print a single task
pub fn print_task(task: &Task, mode: OutputMode) -> io::Result<()> {
    emit(|w, config| match mode {
        OutputMode::Text => print_task_text(w, task, config),
        OutputMode::Json => print_task_json(w, task),
    })
}

/// Print tasks grouped by status column
pub fn print_tasks(tasks: &[Task], mode: OutputMode) -> io::Result<()> {
    emit(|w, config| match mode {
        OutputMode::Text => print_board_text(w, tasks, config),
        OutputMode::Json => print_tasks_json(w, tasks),
    })
}

/// Print a task with its dependencies and dependents (for `show`)
pub fn print_task_details(
    task: &Task,
    dependencies: &[Task],
    dependents: &[Task],
    status: DependencyStatus,
    mode: OutputMode,
) -> io::Result<()> {
    emit(|w, config| match mode {
        OutputMode::Text => {
            print_task_details_text(w, task, dependencies, dependents, status, config)
        }
        OutputMode::Json => print_task_details_json(w, task, dependencies, dependents, status),
    })
}

/// Print the prerequisites (or, with `reverse`, the dependents) of a task
pub fn print_dependency_list(
    task_id: &TaskId,
    tasks: &[Task],
    reverse: bool,
    mode: OutputMode,
) -> io::Result<()> {
    emit(|w, config| match mode {
        OutputMode::Text => print_dependency_list_text(w, task_id, tasks, reverse, config),
        OutputMode::Json => print_dependency_list_json(w, task_id, tasks, reverse),
    })
}

/// Print whether a task's prerequisites are all done
pub fn print_dependency_status(
    task_id: &TaskId,
    status: DependencyStatus,
    mode: OutputMode,
) -> io::Result<()> {
    emit(|w, config| match mode {
        OutputMode::Text => print_dependency_status_text(w, task_id, status, config),
        OutputMode::Json => print_dependency_status_json(w, task_id, status),
    })
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(io::stdout().lock(), "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn task_line(task: &Task, config: &OutputConfig) -> String {
    let mut line = format!(
        "{} {}  {}  {}",
        color::status_icon(task.status, config),
        color::task_id(task.id.as_str(), config),
        color::priority(task.priority, config),
        task.title
    );
    if task.archived {
        line.push_str(&format!(" {}", color::label("(archived)", config)));
    }
    line
}

fn print_task_text<W: Write>(w: &mut W, task: &Task, config: &OutputConfig) -> io::Result<()> {
    writeln!(w, "{}", task_line(task, config))?;
    if let Some(due) = task.due_date {
        writeln!(w, "  {} {}", color::label("Due:", config), due)?;
    }
    Ok(())
}

fn print_board_text<W: Write>(w: &mut W, tasks: &[Task], config: &OutputConfig) -> io::Result<()> {
    if tasks.is_empty() {
        writeln!(w, "No tasks found.")?;
        return Ok(());
    }

    let mut first = true;
    for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
        let column: Vec<&Task> = tasks.iter().filter(|task| task.status == status).collect();
        if column.is_empty() {
            continue;
        }
        if !first {
            writeln!(w)?;
        }
        first = false;

        writeln!(
            w,
            "{} ({})",
            color::heading(&status.to_string(), config),
            column.len()
        )?;
        for task in column {
            writeln!(w, "  {}", task_line(task, config))?;
        }
    }

    Ok(())
}

fn print_task_details_text<W: Write>(
    w: &mut W,
    task: &Task,
    dependencies: &[Task],
    dependents: &[Task],
    status: DependencyStatus,
    config: &OutputConfig,
) -> io::Result<()> {
    let content_width = terminal_width().min(config.max_width);

    writeln!(
        w,
        "{} {}: {}",
        color::status_icon(task.status, config),
        color::task_id(task.id.as_str(), config),
        task.title
    )?;
    writeln!(
        w,
        "{}  {}    {}  {}    {}  {}",
        color::label("Status:", config),
        color::status(task.status, config),
        color::label("Priority:", config),
        color::priority(task.priority, config),
        color::label("Position:", config),
        task.position
    )?;
    writeln!(
        w,
        "{} {}",
        color::label("Project:", config),
        task.project_id
    )?;
    if let Some(due) = task.due_date {
        writeln!(w, "{} {}", color::label("Due:", config), due)?;
    }
    if task.archived {
        writeln!(w, "{}", color::label("Archived", config))?;
    }
    writeln!(
        w,
        "{} {}    {} {}",
        color::label("Created:", config),
        task.created_at.format("%Y-%m-%d %H:%M"),
        color::label("Updated:", config),
        task.updated_at.format("%Y-%m-%d %H:%M")
    )?;

    if !task.description.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", color::heading("Description", config))?;
        for line in wrap_text(&task.description, content_width.saturating_sub(2)) {
            writeln!(w, "  {line}")?;
        }
    }

    if !dependencies.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{} ({}/{} done):",
            color::heading("Depends on", config),
            status.completed,
            status.total
        )?;
        for dep in dependencies {
            writeln!(w, "  {} {}", color::arrow("→", config), task_line(dep, config))?;
        }
    }

    if !dependents.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} ({}):", color::heading("Blocks", config), dependents.len())?;
        for dep in dependents {
            writeln!(w, "  {} {}", color::arrow("←", config), task_line(dep, config))?;
        }
    }

    Ok(())
}

fn print_dependency_list_text<W: Write>(
    w: &mut W,
    task_id: &TaskId,
    tasks: &[Task],
    reverse: bool,
    config: &OutputConfig,
) -> io::Result<()> {
    let id = color::task_id(task_id.as_str(), config);
    if tasks.is_empty() {
        if reverse {
            writeln!(w, "No tasks depend on {id}.")?;
        } else {
            writeln!(w, "{id} has no dependencies.")?;
        }
        return Ok(());
    }

    if reverse {
        writeln!(w, "Tasks depending on {id}:")?;
    } else {
        writeln!(w, "{id} depends on:")?;
    }
    let arrow = if reverse { "←" } else { "→" };
    for task in tasks {
        writeln!(w, "  {} {}", color::arrow(arrow, config), task_line(task, config))?;
    }
    Ok(())
}

fn print_dependency_status_text<W: Write>(
    w: &mut W,
    task_id: &TaskId,
    status: DependencyStatus,
    config: &OutputConfig,
) -> io::Result<()> {
    let summary = format!("{}/{} dependencies done", status.completed, status.total);
    let line = if status.complete {
        success(&format!("ready: {summary}"), config)
    } else {
        warning(&format!("not ready: {summary}"), config)
    };
    writeln!(w, "{} {}", color::task_id(task_id.as_str(), config), line)
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width.max(1))
                    .into_iter()
                    .map(|s| s.into_owned())
                    .collect()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, TaskPriority};
    use chrono::Utc;

    fn plain() -> OutputConfig {
        OutputConfig::new(80, true, false)
    }

    fn task(title: &str, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::generate(),
            title: title.to_string(),
            description: String::new(),
            status,
            priority: TaskPriority::Medium,
            due_date: None,
            user_id: "personal".to_string(),
            project_id: "default".to_string(),
            position: 0,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn board_groups_tasks_by_column() {
        let tasks = vec![
            task("Write tests", TaskStatus::Todo),
            task("Ship", TaskStatus::Done),
            task("Review", TaskStatus::Todo),
        ];
        let out = render(|w| print_board_text(w, &tasks, &plain()));

        let todo = out.find("todo (2)").unwrap();
        let done = out.find("done (1)").unwrap();
        assert!(todo < done);
        assert!(!out.contains("in_progress"));
        assert!(out.contains("Review"));
    }

    #[test]
    fn empty_board_says_so() {
        let out = render(|w| print_board_text(w, &[], &plain()));
        assert_eq!(out, "No tasks found.\n");
    }

    #[test]
    fn archived_tasks_are_marked() {
        let mut t = task("Old", TaskStatus::Todo);
        t.archived = true;
        let out = render(|w| print_task_text(w, &t, &plain()));
        assert!(out.contains("(archived)"));
    }

    #[test]
    fn dependency_status_text_reports_counts() {
        let id = TaskId::generate();
        let out = render(|w| {
            print_dependency_status_text(w, &id, DependencyStatus::from_counts(3, 2), &plain())
        });
        assert!(out.contains("not ready: 2/3 dependencies done"));

        let out = render(|w| {
            print_dependency_status_text(w, &id, DependencyStatus::from_counts(0, 0), &plain())
        });
        assert!(out.contains("ready: 0/0"));
    }

    #[test]
    fn dependency_list_text_handles_empty_and_reverse() {
        let id = TaskId::generate();
        let out = render(|w| print_dependency_list_text(w, &id, &[], false, &plain()));
        assert!(out.contains("has no dependencies"));

        let dependents = vec![task("Deploy", TaskStatus::Todo)];
        let out = render(|w| print_dependency_list_text(w, &id, &dependents, true, &plain()));
        assert!(out.contains("Tasks depending on"));
        assert!(out.contains("Deploy"));
    }

    #[test]
    fn details_json_flattens_task_and_adds_dependency_fields() {
        let t = task("Build", TaskStatus::Todo);
        let prereq = task("Design", TaskStatus::Done);
        let out = render(|w| {
            print_task_details_json(
                w,
                &t,
                std::slice::from_ref(&prereq),
                &[],
                DependencyStatus::from_counts(1, 1),
            )
        });

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["title"], "Build");
        assert_eq!(value["dependencies"][0]["title"], "Design");
        assert_eq!(value["dependents"].as_array().unwrap().len(), 0);
        assert_eq!(value["dependency_status"]["complete"], true);
    }

    #[test]
    fn flags_accept_numbers_and_words() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("False"), Some(false));
        assert_eq!(parse_flag("yes"), None);
    }

    #[test]
    fn wrap_text_preserves_blank_lines() {
        let lines = wrap_text("first line\n\nsecond", 80);
        assert_eq!(lines, vec!["first line", "", "second"]);
    }
}
