//! # sprintwatch-core
//!
//! The sprint delivery health engine. Given a snapshot of work item rows it
//! computes per-sprint metrics, window-wide KPIs and a health report that
//! classifies sprints against a predictability threshold and attributes
//! blame to individual items.
//!
//! ## Pipeline
//!
//! ```text
//! RawTable ──▶ normalize ──▶ records ──┬──▶ WindowSpec::resolve ──▶ SprintWindow
//!                                      │                                │
//!                                      └────────────┬───────────────────┘
//!                                                   ▼
//!                                               aggregate ──▶ Vec<SprintMetrics>
//!                                                   │
//!                                  ┌────────────────┴────────────────┐
//!                                  ▼                                 ▼
//!                              summarize                          classify
//!                             (WindowKpis)                     (HealthReport)
//! ```
//!
//! Every stage is a pure function of its inputs. A run either produces the
//! full [`Analysis`] or an [`AnalysisError`]; there is no partial output.
//!
//! ## Example
//!
//! ```
//! use sprintwatch_core::{analyze, AnalysisConfig};
//! use sprintwatch_types::{RowRef, WorkItemRecord};
//!
//! let records = vec![
//!     WorkItemRecord::builder()
//!         .sprint("S1")
//!         .committed_pts(5.0)
//!         .story_points(5.0)
//!         .state("Accepted")
//!         .outcome("Committed")
//!         .row(RowRef::new(1))
//!         .build(),
//!     WorkItemRecord::builder()
//!         .sprint("S1")
//!         .story_points(2.0)
//!         .state("New")
//!         .outcome("Added")
//!         .row(RowRef::new(2))
//!         .build(),
//! ];
//!
//! let analysis = analyze(&records, &AnalysisConfig::default()).unwrap();
//! assert_eq!(analysis.metrics[0].predictability, 1.0);
//! assert_eq!(analysis.metrics[0].scope_change, 0.4);
//! assert_eq!(analysis.report.good_items[0].contribution_pct, 0.4);
//! ```

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod summary;
pub mod table;
pub mod window;

pub use aggregate::aggregate;
pub use classify::{classify, contribution, sprint_status, DEFAULT_THRESHOLD};
pub use error::AnalysisError;
pub use normalize::{normalize, Coercion, Normalized};
pub use pipeline::{analyze, analyze_table, Analysis, AnalysisConfig};
pub use schema::{Column, ColumnSchema};
pub use summary::summarize;
pub use table::{RawRow, RawTable, RawValue};
pub use window::{SprintWindow, WindowSource, WindowSpec, DEFAULT_LAST_N};

// Re-export types for convenience
pub use sprintwatch_types::*;
