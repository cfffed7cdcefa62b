//! Domain types for the task board.
//!
//! Tasks are owned by a [`TaskStore`](crate::storage::TaskStore); dependency
//! edges are owned by the [`DependencyGraphService`](crate::service::DependencyGraphService).
//! Every stored row is typed and validated at the storage boundary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length of a task title (after trimming).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of a task description.
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

/// Unique identifier for a task.
///
/// Well-formed ids are hyphenated UUIDs. Construct with [`TaskId::parse`] or
/// [`TaskId::generate`]; deserialization goes through the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Parse and validate a task id.
    ///
    /// Surrounding whitespace is ignored and the id is normalized to the
    /// lowercase hyphenated form.
    ///
    /// # Errors
    ///
    /// Returns a validation message if `s` is not a hyphenated UUID.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Task ID cannot be empty".to_string());
        }
        // Only the 36-char hyphenated form is accepted; Uuid::parse_str also
        // takes simple, braced and urn forms.
        if s.len() != 36 {
            return Err(format!("Invalid task ID '{s}': expected a hyphenated UUID"));
        }
        let uuid = Uuid::parse_str(s)
            .map_err(|e| format!("Invalid task ID '{s}': {e}"))?;
        Ok(Self(uuid.hyphenated().to_string()))
    }

    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TaskId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl std::str::FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The user and project every task and edge belongs to.
///
/// Passed explicitly to every store and graph operation; nothing is scoped
/// implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scope {
    /// Owner of the tasks.
    pub user_id: String,

    /// Project the tasks belong to.
    pub project_id: String,
}

impl Scope {
    /// Create a validated scope.
    ///
    /// # Errors
    ///
    /// Returns a validation message if either part is empty.
    pub fn new(user_id: impl Into<String>, project_id: impl Into<String>) -> Result<Self, String> {
        let scope = Self {
            user_id: user_id.into().trim().to_string(),
            project_id: project_id.into().trim().to_string(),
        };
        scope.validate()?;
        Ok(scope)
    }

    /// Check both parts are non-blank. Struct literals skip `new`'s trimming,
    /// so whitespace-only parts are rejected here.
    ///
    /// # Errors
    ///
    /// Returns a validation message naming the empty part.
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("User ID cannot be empty".to_string());
        }
        if self.project_id.trim().is_empty() {
            return Err("Project ID cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.project_id)
    }
}

/// Status of a task (its Kanban column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Currently being worked on
    InProgress,

    /// Finished; the only status that satisfies a dependency
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "todo"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Nice to have
    Low,

    /// Default
    Medium,

    /// Important
    High,

    /// Drop everything
    Critical,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// A task on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Short title
    pub title: String,

    /// Longer description, possibly empty
    #[serde(default)]
    pub description: String,

    /// Current status
    pub status: TaskStatus,

    /// Priority level
    pub priority: TaskPriority,

    /// Optional due date
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Owning user
    pub user_id: String,

    /// Owning project
    pub project_id: String,

    /// Order within the task's status column (0 = top)
    pub position: u32,

    /// Hidden from the board but otherwise an ordinary task
    #[serde(default)]
    pub archived: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether this task belongs to the given scope.
    #[must_use]
    pub fn in_scope(&self, scope: &Scope) -> bool {
        self.user_id == scope.user_id && self.project_id == scope.project_id
    }

    /// Validate field constraints on a stored task.
    ///
    /// # Errors
    ///
    /// Returns a validation message for the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        if self.user_id.trim().is_empty() || self.project_id.trim().is_empty() {
            return Err("Task must belong to a user and a project".to_string());
        }
        Ok(())
    }
}

/// Data for creating a new task.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Title (trimmed on creation)
    pub title: String,

    /// Description
    pub description: String,

    /// Initial status (column)
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    /// Convenience constructor for a `todo`, `medium` task with no description.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
        }
    }

    /// Validate title and description.
    ///
    /// # Errors
    ///
    /// Returns a validation message for the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }
}

/// Data for updating an existing task. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New due date (`Some(None)` clears it)
    pub due_date: Option<Option<NaiveDate>>,

    /// New column position
    pub position: Option<u32>,

    /// Archive or unarchive
    pub archived: Option<bool>,
}

impl TaskUpdate {
    /// True when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.position.is_none()
            && self.archived.is_none()
    }

    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns a validation message if the update is empty or a field is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("No fields to update".to_string());
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

/// A column move from a drag-and-drop reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    /// Task being moved
    pub id: TaskId,

    /// Destination column
    pub status: TaskStatus,

    /// Destination position within the column
    pub position: u32,
}

/// A directed edge: `task_id` depends on `depends_on_task_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The dependent task
    pub task_id: TaskId,

    /// The prerequisite task
    pub depends_on_task_id: TaskId,

    /// When the edge was created
    pub created_at: DateTime<Utc>,
}

/// Derived completion readiness of a task's prerequisites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Number of prerequisites
    pub total: usize,

    /// Number of prerequisites whose status is `done`
    pub completed: usize,

    /// `total == completed`; vacuously true with no prerequisites
    pub complete: bool,
}

impl DependencyStatus {
    /// Build a status from counts.
    #[must_use]
    pub fn from_counts(total: usize, completed: usize) -> Self {
        Self {
            total,
            completed,
            complete: total == completed,
        }
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if trimmed.contains(['\n', '\r']) {
        return Err("Title cannot contain newline characters".to_string());
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title cannot exceed {MAX_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), String> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LENGTH} characters"
        ));
    }
    Ok(())
}
