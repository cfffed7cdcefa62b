//! JSONL (JSON Lines) persistence helpers for taskweave.
//!
//! Provides line-tracking async reading with resilient parsing (bad lines
//! become [`Warning`]s instead of errors), buffered writing, and atomic
//! temp-file-then-rename writes used by the task and dependency stores.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod warning;
pub mod writer;

pub use atomic::{write_jsonl_atomic, write_jsonl_atomic_iter};
pub use error::{Error, Result};
pub use reader::{read_jsonl_resilient, JsonlReader};
pub use warning::{Warning, WarningKind};
pub use writer::JsonlWriter;
