//! Data source abstraction for receiving work item tables.
//!
//! A source yields whole [`RawTable`] snapshots: from a CSV or JSON export
//! on disk, or pushed through an in-memory channel by an embedding program.

mod channel;
mod file;
mod parse;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use parse::{
    load_sprint_list, parse_csv, parse_json, parse_sprint_list, read_table, TableFormat,
};

use std::fmt::Debug;

use sprintwatch_core::RawTable;
use thiserror::Error;

/// Errors raised while reading a table or a sprint list.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Format(String),
}

/// Trait for receiving work item tables from various sources.
///
/// # Example
///
/// ```no_run
/// use sprintwatch::{FileSource, TableSource};
///
/// let mut source = FileSource::new("sprints.csv");
/// if let Some(table) = source.poll() {
///     println!("Got {} rows", table.len());
/// }
/// ```
pub trait TableSource: Send + Debug {
    /// Poll for the latest table.
    ///
    /// Returns `Some(table)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<RawTable>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar and in exports.
    fn description(&self) -> &str;

    /// Returns the error message if the last poll failed.
    fn error(&self) -> Option<&str>;

    /// Forget change tracking so the next poll returns the current table.
    fn invalidate(&mut self) {}
}
