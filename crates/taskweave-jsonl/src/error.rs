//! Error types for taskweave-jsonl operations.

use std::io;
use thiserror::Error;

/// Fatal JSONL failures. Undecodable lines are [`crate::Warning`]s, not errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the underlying file failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A value could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for taskweave-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
