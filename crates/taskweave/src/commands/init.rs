//! Implementation of the `init` command.
//!
//! Creates the `.taskweave/` directory with its configuration and empty
//! data files, and locates an existing workspace from any subdirectory.

use crate::error::{ConfigError, Result};
use crate::storage::{backend_from_name, StorageBackend};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the workspace directory
pub const WORKSPACE_DIR_NAME: &str = ".taskweave";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the tasks data file
pub const TASKS_FILE_NAME: &str = "tasks.jsonl";

/// Name of the dependency edges data file
pub const DEPENDENCIES_FILE_NAME: &str = "dependencies.jsonl";

/// User id written by `init` when none is given
pub const DEFAULT_USER_ID: &str = "personal";

/// Project used when a command does not name one
pub const DEFAULT_PROJECT: &str = "default";

/// Maximum length of a user or project name
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum directory depth to traverse when searching for the workspace root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Contents of `.taskweave/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Owner of every task in this workspace
    #[serde(rename = "user-id")]
    pub user_id: String,

    /// Project used when `--project` is not given
    #[serde(rename = "default-project")]
    pub default_project: String,

    /// Storage configuration
    pub storage: StorageConfig,
}

/// Storage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// `jsonl` (persistent) or `memory` (discarded on exit)
    pub backend: String,

    /// Tasks file, relative to the workspace root
    pub tasks_file: String,

    /// Dependency edges file, relative to the workspace root
    pub dependencies_file: String,
}

impl StorageConfig {
    /// Resolve the configured backend against the workspace root.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::UnsupportedBackend` for an unknown backend.
    pub fn to_backend(&self, root: &Path) -> Result<StorageBackend> {
        backend_from_name(&self.backend, root.join(&self.tasks_file))
    }

    /// Absolute path of the dependency edges file.
    pub fn dependencies_path(&self, root: &Path) -> PathBuf {
        root.join(&self.dependencies_file)
    }
}

impl WorkspaceConfig {
    /// Create a configuration for the given user and default project.
    pub fn new(user_id: &str, default_project: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            default_project: default_project.to_string(),
            storage: StorageConfig {
                backend: "jsonl".to_string(),
                tasks_file: format!("{WORKSPACE_DIR_NAME}/{TASKS_FILE_NAME}"),
                dependencies_file: format!("{WORKSPACE_DIR_NAME}/{DEPENDENCIES_FILE_NAME}"),
            },
        }
    }

    /// Load and validate configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// names an invalid user or project.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self = serde_yaml::from_str(&content).map_err(ConfigError::from)?;
        validate_name("user-id", &config.user_id)?;
        validate_name("default-project", &config.default_project)?;
        Ok(config)
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(ConfigError::from)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_USER_ID, DEFAULT_PROJECT)
    }
}

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created workspace directory
    pub workspace_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created tasks file
    pub tasks_file: PathBuf,
    /// Path to the created dependencies file
    pub dependencies_file: PathBuf,
    /// The configured user id
    pub user_id: String,
    /// The configured default project
    pub default_project: String,
}

/// Validate a user or project name.
///
/// Names are 1-64 characters of ASCII letters, digits, `-` or `_`.
/// Expects pre-trimmed input.
///
/// # Errors
///
/// Returns `ConfigError::Invalid` naming the field.
pub fn validate_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} cannot be empty")).into());
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "{field} cannot exceed {MAX_NAME_LENGTH} characters"
        ))
        .into());
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Invalid(format!(
            "{field} must contain only letters, digits, '-' or '_'"
        ))
        .into());
    }

    Ok(())
}

/// Initialize a new workspace in the given directory.
///
/// # Errors
///
/// Returns an error if:
/// - The `.taskweave/` directory already exists
/// - The user or project name is invalid
/// - File system operations fail
pub async fn init(
    base_dir: &Path,
    user_id: Option<&str>,
    default_project: Option<&str>,
) -> Result<InitResult> {
    let user_id = user_id.unwrap_or(DEFAULT_USER_ID).trim();
    let default_project = default_project.unwrap_or(DEFAULT_PROJECT).trim();
    validate_name("user-id", user_id)?;
    validate_name("default-project", default_project)?;

    let workspace_dir = base_dir.join(WORKSPACE_DIR_NAME);
    if workspace_dir.exists() {
        return Err(ConfigError::AlreadyInitialized(workspace_dir).into());
    }

    fs::create_dir_all(&workspace_dir).await?;

    let config_file = workspace_dir.join(CONFIG_FILE_NAME);
    WorkspaceConfig::new(user_id, default_project)
        .save(&config_file)
        .await?;

    let tasks_file = workspace_dir.join(TASKS_FILE_NAME);
    fs::write(&tasks_file, "").await?;

    let dependencies_file = workspace_dir.join(DEPENDENCIES_FILE_NAME);
    fs::write(&dependencies_file, "").await?;

    tracing::info!(path = %workspace_dir.display(), user_id, default_project, "Workspace initialized");

    Ok(InitResult {
        workspace_dir,
        config_file,
        tasks_file,
        dependencies_file,
        user_id: user_id.to_string(),
        default_project: default_project.to_string(),
    })
}

/// Find the workspace root by searching up the directory tree.
///
/// Returns the directory containing `.taskweave/`, or `None` if the
/// filesystem root or the depth limit is reached first.
pub fn find_workspace_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(WORKSPACE_DIR_NAME).is_dir() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
