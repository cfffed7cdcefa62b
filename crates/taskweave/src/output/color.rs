//! Terminal styling for text output.
//!
//! Every styled string goes through [`paint`] with a [`Tone`], so turning
//! colors off (`NO_COLOR`, non-TTY) is handled in one place.
//!
//! | Tone      | Style      | Used for                                  |
//! |-----------|------------|-------------------------------------------|
//! | Good      | green      | `done`, ready dependency checks           |
//! | Caution   | yellow     | `in_progress`, high priority, not ready   |
//! | Alarm     | bold red   | critical priority                         |
//! | Reference | cyan       | task ids, dependency arrows               |
//! | Muted     | dimmed     | field labels, low priority, archived      |
//! | Strong    | bold       | section headers                           |

use crate::domain::{TaskPriority, TaskStatus};
use colored::Colorize;

use super::OutputConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Plain,
    Good,
    Caution,
    Alarm,
    Reference,
    Muted,
    Strong,
}

fn paint(text: &str, tone: Tone, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    match tone {
        Tone::Plain => text.to_string(),
        Tone::Good => text.green().to_string(),
        Tone::Caution => text.yellow().to_string(),
        Tone::Alarm => text.red().bold().to_string(),
        Tone::Reference => text.cyan().to_string(),
        Tone::Muted => text.dimmed().to_string(),
        Tone::Strong => text.bold().to_string(),
    }
}

fn status_tone(status: TaskStatus) -> Tone {
    match status {
        TaskStatus::Todo => Tone::Plain,
        TaskStatus::InProgress => Tone::Caution,
        TaskStatus::Done => Tone::Good,
    }
}

/// Green text, for outcomes that went well.
pub fn success(text: &str, config: &OutputConfig) -> String {
    paint(text, Tone::Good, config)
}

/// Yellow text, for outcomes that need attention.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    paint(text, Tone::Caution, config)
}

pub(crate) fn status(status: TaskStatus, config: &OutputConfig) -> String {
    paint(&status.to_string(), status_tone(status), config)
}

pub(crate) fn priority(priority: TaskPriority, config: &OutputConfig) -> String {
    let tone = match priority {
        TaskPriority::Critical => Tone::Alarm,
        TaskPriority::High => Tone::Caution,
        TaskPriority::Medium => Tone::Plain,
        TaskPriority::Low => Tone::Muted,
    };
    paint(&priority.to_string(), tone, config)
}

pub(crate) fn task_id(id: &str, config: &OutputConfig) -> String {
    paint(id, Tone::Reference, config)
}

/// Column marker, with plain ASCII fallbacks for limited terminals.
pub(crate) fn status_icon(status: TaskStatus, config: &OutputConfig) -> String {
    let icon = match (status, config.use_ascii) {
        (TaskStatus::Todo, true) => "o",
        (TaskStatus::InProgress, true) => ">",
        (TaskStatus::Done, true) => "+",
        (TaskStatus::Todo, false) => "○",
        (TaskStatus::InProgress, false) => "▶",
        (TaskStatus::Done, false) => "✓",
    };
    paint(icon, status_tone(status), config)
}

pub(crate) fn label(text: &str, config: &OutputConfig) -> String {
    paint(text, Tone::Muted, config)
}

pub(crate) fn heading(text: &str, config: &OutputConfig) -> String {
    paint(text, Tone::Strong, config)
}

pub(crate) fn arrow(text: &str, config: &OutputConfig) -> String {
    paint(text, Tone::Reference, config)
}
