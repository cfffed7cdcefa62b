//! Application context for CLI command execution.
//!
//! [`App`] finds the workspace, loads its configuration, opens the task
//! store and the dependency edge file, and hands out [`Scope`]s built from
//! the configured user id.
//!
//! # Example
//!
//! ```no_run
//! use taskweave::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     let scope = app.scope(None)?;
//!     let tasks = app.board().list_tasks(&scope, false).await?;
//!     println!("{} tasks", tasks.len());
//!     Ok(())
//! }
//! ```

use crate::board::Board;
use crate::commands::init::{
    find_workspace_root, validate_name, WorkspaceConfig, CONFIG_FILE_NAME, WORKSPACE_DIR_NAME,
};
use crate::domain::Scope;
use crate::error::{ConfigError, Error, Result};
use crate::storage::{create_task_store, StorageBackend};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application context for CLI operations.
pub struct App {
    board: Board,

    /// Path to the workspace directory (`.taskweave`)
    workspace_dir: PathBuf,

    /// Loaded configuration
    config: WorkspaceConfig,

    /// Edge file; `None` for the in-memory backend
    dependencies_path: Option<PathBuf>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("workspace_dir", &self.workspace_dir)
            .field("config", &self.config)
            .field("dependencies_path", &self.dependencies_path)
            .field("board", &"<Board>")
            .finish()
    }
}

impl App {
    /// Create an App from the given working directory.
    ///
    /// Searches up the directory tree for `.taskweave/`, loads the
    /// configuration, the tasks and then the dependency edges. Edges that
    /// no longer fit (missing tasks, cycles) are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No workspace is found in the directory tree
    /// - Configuration cannot be loaded
    /// - A data file cannot be read
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_workspace_root(working_dir).ok_or(ConfigError::NotInitialized)?;

        let workspace_dir = root_dir.join(WORKSPACE_DIR_NAME);
        let config = WorkspaceConfig::load(&workspace_dir.join(CONFIG_FILE_NAME)).await?;

        let backend = config.storage.to_backend(&root_dir)?;
        let dependencies_path = match backend {
            StorageBackend::Jsonl(_) => Some(config.storage.dependencies_path(&root_dir)),
            StorageBackend::InMemory => None,
        };

        let store = create_task_store(backend).await?;
        let board = Board::new(Arc::from(store));

        if let Some(path) = dependencies_path.as_deref().filter(|path| path.exists()) {
            board.dependencies().load(path).await?;
        }

        tracing::debug!(path = %workspace_dir.display(), user_id = %config.user_id, "Workspace opened");

        Ok(Self {
            board,
            workspace_dir,
            config,
            dependencies_path,
        })
    }

    /// The board for this workspace.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Loaded configuration.
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Path to the `.taskweave` directory.
    pub fn workspace_dir(&self) -> &Path {
        &self.workspace_dir
    }

    /// Scope for the configured user and the given (or default) project.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the project name is invalid.
    pub fn scope(&self, project: Option<&str>) -> Result<Scope> {
        let project = project.unwrap_or(&self.config.default_project).trim();
        validate_name("project", project)?;
        Scope::new(self.config.user_id.as_str(), project).map_err(Error::Validation)
    }

    /// Write tasks and dependency edges back to disk.
    ///
    /// This should be called after any mutating operation.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written.
    pub async fn save(&self) -> Result<()> {
        self.board.tasks().save().await?;
        if let Some(path) = &self.dependencies_path {
            self.board.dependencies().save(path).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init;
    use crate::domain::NewTask;
    use tempfile::TempDir;

    #[tokio::test]
    async fn app_from_initialized_directory() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path(), Some("alice"), None).await.unwrap();

        let app = App::from_directory(temp_dir.path()).await.unwrap();

        assert_eq!(app.config().user_id, "alice");
        assert!(app.workspace_dir().ends_with(".taskweave"));
        let scope = app.scope(None).unwrap();
        assert_eq!(scope.project_id, "default");
    }

    #[tokio::test]
    async fn app_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path(), None, Some("garden")).await.unwrap();
        let sub_dir = temp_dir.path().join("src").join("lib");
        std::fs::create_dir_all(&sub_dir).unwrap();

        let app = App::from_directory(&sub_dir).await.unwrap();
        assert_eq!(app.scope(None).unwrap().project_id, "garden");
    }

    #[tokio::test]
    async fn app_from_uninitialized_directory() {
        let temp_dir = TempDir::new().unwrap();

        let err = App::from_directory(temp_dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("taskweave init"));
    }

    #[tokio::test]
    async fn scope_rejects_invalid_project() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path(), None, None).await.unwrap();
        let app = App::from_directory(temp_dir.path()).await.unwrap();

        assert!(app.scope(Some("two words")).is_err());
        assert_eq!(app.scope(Some(" work ")).unwrap().project_id, "work");
    }

    #[tokio::test]
    async fn save_persists_tasks_and_edges() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path(), None, None).await.unwrap();

        {
            let app = App::from_directory(temp_dir.path()).await.unwrap();
            let scope = app.scope(None).unwrap();
            let board = app.board();
            let a = board.create_task(&scope, NewTask::titled("A")).await.unwrap();
            let b = board.create_task(&scope, NewTask::titled("B")).await.unwrap();
            board.add_dependency(&scope, &b.id, &a.id).await.unwrap();
            app.save().await.unwrap();
        }

        let app = App::from_directory(temp_dir.path()).await.unwrap();
        let scope = app.scope(None).unwrap();
        let tasks = app.board().list_tasks(&scope, true).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(app.board().dependencies().edge_count(&scope).await.unwrap(), 1);
    }
}
