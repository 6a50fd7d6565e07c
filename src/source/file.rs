//! File-based data source.
//!
//! Polls a CSV or JSON export for work item rows.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use sprintwatch_core::RawTable;
use tracing::{debug, warn};

use super::{read_table, TableFormat, TableSource};

/// A data source that reads work item rows from an exported file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    format: TableFormat,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = TableFormat::from_path(&path);
        let description = format!("file: {}", path.display());
        Self {
            path,
            format,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> TableFormat {
        self.format
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<RawTable> {
        match read_table(&self.path) {
            Ok(table) => {
                debug!(path = %self.path.display(), rows = table.len(), "read table");
                self.last_error = None;
                Some(table)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read table");
                self.last_error = Some(e.to_string());
                None
            }
        }
    }
}

impl TableSource for FileSource {
    fn poll(&mut self) -> Option<RawTable> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(table) = self.read_file() {
                self.last_modified = current_modified;
                return Some(table);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn invalidate(&mut self) {
        self.last_modified = None;
    }
}
