//! JSONL reading operations.
//!
//! [`JsonlReader`] reads line by line with 1-based line tracking. Reading is
//! resilient: a line that fails to decode becomes an [`Entry::Warning`] and
//! reading continues with the next line. Blank lines are ignored. Lines
//! are read as bytes, so invalid UTF-8 is a warning rather than an I/O error.

use crate::warning::Warning;
use crate::Result;
use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::pin::pin;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// One decoded line: either a record or the warning that replaced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T> {
    /// A successfully decoded record.
    Record(T),
    /// A line that could not be decoded.
    Warning(Warning),
}

/// Async reader for JSONL (JSON Lines) data.
///
/// # Examples
///
/// ```no_run
/// use taskweave_jsonl::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("tasks.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(entry) = reader.next_entry::<serde_json::Value>().await? {
///     println!("line {}: {:?}", reader.line_number(), entry);
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    reader: BufReader<R>,
    /// 1-based number of the last line read, 0 before any line.
    line_number: usize,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buf: Vec::new(),
        }
    }

    /// Returns the 1-based number of the last line read (0 before any line).
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next raw line into the internal buffer.
    ///
    /// Returns `false` at end of input.
    async fn fill_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        Ok(true)
    }

    /// Decodes the next non-blank line.
    ///
    /// Returns `Ok(None)` at end of input. Decode failures are returned as
    /// [`Entry::Warning`]; only I/O failures are errors.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the underlying reader fails.
    pub async fn next_entry<T: DeserializeOwned>(&mut self) -> Result<Option<Entry<T>>> {
        loop {
            if !self.fill_line().await? {
                return Ok(None);
            }

            let line = match std::str::from_utf8(&self.buf) {
                Ok(line) => line.trim(),
                Err(err) => {
                    let warning = Warning::invalid_utf8(self.line_number, &err);
                    return Ok(Some(Entry::Warning(warning)));
                }
            };
            if line.is_empty() {
                continue;
            }

            let entry = match serde_json::from_str::<T>(line) {
                Ok(value) => Entry::Record(value),
                Err(err) => Entry::Warning(Warning::from_decode_error(self.line_number, &err)),
            };
            return Ok(Some(entry));
        }
    }

    /// Converts the reader into a stream of decoded entries.
    ///
    /// The stream ends after the first I/O error.
    pub fn stream_resilient<T: DeserializeOwned>(self) -> impl Stream<Item = Result<Entry<T>>> {
        stream::unfold(Some(self), |state| async move {
            let mut reader = state?;
            match reader.next_entry::<T>().await {
                Ok(Some(entry)) => Some((Ok(entry), Some(reader))),
                Ok(None) => None,
                Err(err) => Some((Err(err), None)),
            }
        })
    }
}

/// Reads every record from a JSONL file, collecting warnings for bad lines.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be opened or read.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).await?;
    let mut entries = pin!(JsonlReader::new(file).stream_resilient::<T>());

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    while let Some(entry) = entries.next().await {
        match entry? {
            Entry::Record(record) => records.push(record),
            Entry::Warning(warning) => {
                tracing::debug!(path = %path.display(), %warning, "Skipping JSONL line");
                warnings.push(warning);
            }
        }
    }

    Ok((records, warnings))
}
