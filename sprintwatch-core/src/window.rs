//! Window selection: which sprints a run analyzes, and in what order.

use std::collections::HashSet;

use sprintwatch_types::WorkItemRecord;
use tracing::{info, warn};

use crate::error::AnalysisError;
use crate::normalize::{clean_text, match_key};

/// Default number of sprints taken by the last-N fallback.
pub const DEFAULT_LAST_N: usize = 6;

/// Which path produced the resolved window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSource {
    /// Comma-separated list supplied by the caller.
    Explicit,
    /// Externally curated, ordered sprint list.
    Curated,
    /// The most recent distinct sprints found in the records.
    LastN,
}

impl WindowSource {
    pub fn label(&self) -> &'static str {
        match self {
            WindowSource::Explicit => "explicit",
            WindowSource::Curated => "curated",
            WindowSource::LastN => "last-n",
        }
    }
}

/// How to resolve the window, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    /// Comma-separated sprint ids. Takes precedence when it yields any id.
    pub explicit: Option<String>,
    /// Ordered sprint ids from a curated list.
    pub curated: Vec<String>,
    /// Size of the fallback window.
    pub last_n: usize,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            explicit: None,
            curated: Vec::new(),
            last_n: DEFAULT_LAST_N,
        }
    }
}

/// The ordered, deduplicated set of sprints under analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct SprintWindow {
    sprints: Vec<String>,
    keys: HashSet<String>,
    source: WindowSource,
}

impl SprintWindow {
    fn new(source: WindowSource) -> Self {
        Self {
            sprints: Vec::new(),
            keys: HashSet::new(),
            source,
        }
    }

    /// Add an id unless it is blank or already present. First spelling wins.
    fn push(&mut self, id: &str) {
        let id = clean_text(id);
        if id.is_empty() {
            return;
        }
        if self.keys.insert(match_key(&id)) {
            self.sprints.push(id);
        }
    }

    /// Sprint ids in presentation order.
    pub fn sprints(&self) -> &[String] {
        &self.sprints
    }

    pub fn source(&self) -> WindowSource {
        self.source
    }

    /// Set membership, using the same matching as aggregation.
    pub fn contains(&self, sprint: &str) -> bool {
        self.keys.contains(&match_key(sprint))
    }

    pub fn len(&self) -> usize {
        self.sprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprints.is_empty()
    }
}

impl WindowSpec {
    /// Resolve the window against a set of normalized records.
    ///
    /// Fails with [`AnalysisError::EmptyWindow`] if no path yields a sprint.
    pub fn resolve(&self, records: &[WorkItemRecord]) -> Result<SprintWindow, AnalysisError> {
        let window = self
            .resolve_explicit()
            .or_else(|| self.resolve_curated())
            .unwrap_or_else(|| self.resolve_last_n(records));

        if window.is_empty() {
            return Err(AnalysisError::EmptyWindow);
        }

        if window.source != WindowSource::LastN {
            let present: HashSet<String> = records.iter().map(|r| match_key(&r.sprint)).collect();
            for sprint in &window.sprints {
                if !present.contains(&match_key(sprint)) {
                    warn!(
                        sprint = %sprint,
                        source = window.source.label(),
                        "window sprint has no records"
                    );
                }
            }
        }

        info!(
            source = window.source.label(),
            sprints = %window.sprints.join(", "),
            "resolved sprint window"
        );
        Ok(window)
    }

    fn resolve_explicit(&self) -> Option<SprintWindow> {
        let spec = self.explicit.as_deref()?;
        let mut window = SprintWindow::new(WindowSource::Explicit);
        for id in spec.split(',') {
            window.push(id);
        }
        (!window.is_empty()).then_some(window)
    }

    fn resolve_curated(&self) -> Option<SprintWindow> {
        let mut window = SprintWindow::new(WindowSource::Curated);
        for id in &self.curated {
            window.push(id);
        }
        (!window.is_empty()).then_some(window)
    }

    fn resolve_last_n(&self, records: &[WorkItemRecord]) -> SprintWindow {
        let mut window = SprintWindow::new(WindowSource::LastN);
        for record in records.iter().rev() {
            if window.len() >= self.last_n {
                break;
            }
            window.push(&record.sprint);
        }
        window.sprints.reverse();
        window
    }
}
