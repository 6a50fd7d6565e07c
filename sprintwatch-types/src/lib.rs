//! # sprintwatch-types
//!
//! Core types for sprint delivery health. This crate defines the records that
//! flow into the sprintwatch analysis engine and the derived structures that
//! flow out of it: per-sprint metrics, window-wide KPIs and health reports.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable `serde` for JSON export and import
//! - **Plain data**: Everything here is an owned value; no handles to documents or files
//! - **Ergonomic builders**: Fluent API for constructing work item records
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON/TOML/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use sprintwatch_types::{RowRef, WorkItemRecord};
//!
//! let record = WorkItemRecord::builder()
//!     .sprint("2024.03")
//!     .item_id("STORY-12")
//!     .committed_pts(5.0)
//!     .story_points(5.0)
//!     .state("Accepted")
//!     .outcome("Committed")
//!     .row(RowRef::new(1))
//!     .build();
//!
//! assert_eq!(record.sprint, "2024.03");
//! assert_eq!(record.committed_pts, 5.0);
//! ```
//!
//! ## Schema Version
//!
//! The current report schema version is **1**. The version is included in
//! exported reports so consumers can handle format evolution gracefully.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod health;
mod metrics;
mod record;
mod version;

pub use health::*;
pub use metrics::*;
pub use record::*;
pub use version::*;

/// Current report schema version.
///
/// Increment this when making breaking changes to the exported report format.
pub const SCHEMA_VERSION: u32 = 1;
