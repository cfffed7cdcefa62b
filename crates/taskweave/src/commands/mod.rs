//! Workspace-level command implementations.

pub mod init;
