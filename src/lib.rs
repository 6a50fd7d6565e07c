//! # sprintwatch
//!
//! A sprint delivery health viewer and report generator.
//!
//! Reads work item exports (CSV or JSON), runs them through the
//! [`sprintwatch_core`] engine and presents per-sprint predictability, scope
//! volatility and per-item blame, either in an interactive terminal UI or as
//! JSON/CSV reports.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   core   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(analysis)│    │(render) │    │         │  │
//! │  └────┬────┘    └────┬─────┘    └─────────┘    └─────────┘  │
//! │       │              │                                      │
//! │       ▼              ▼                                      │
//! │  ┌─────────┐    ┌──────────┐                                │
//! │  │ source  │    │  export  │──▶ JSON | CSV | write-back     │
//! │  │ (input) │    │ (sinks)  │                                │
//! │  └─────────┘    └──────────┘                                │
//! │       ▲                                                     │
//! │       └── FileSource | ChannelSource                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: Input abstraction ([`TableSource`] trait) with file and
//!   channel implementations, plus curated sprint list loading
//! - **[`settings`]**: Layered configuration (defaults, TOML, environment, flags)
//! - **[`export`]**: JSON report, CSV report set, text summary, numeric write-back
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Browse an export interactively
//! sprintwatch --file sprints.csv
//!
//! # Analyze an explicit window and write every report
//! sprintwatch --file sprints.csv --sprints "S7,S8,S9" --reports out/ --export out/report.json
//! ```
//!
//! ### As a library with file source
//!
//! ```
//! use sprintwatch::{App, AnalysisConfig, FileSource};
//!
//! let source = Box::new(FileSource::new("sprints.csv"));
//! let app = App::new(source, AnalysisConfig::default());
//! ```
//!
//! ### As a library with channel source
//!
//! ```
//! use sprintwatch::{App, AnalysisConfig, ChannelSource};
//!
//! let (tx, source) = ChannelSource::create("tracker sync");
//! let app = App::new(Box::new(source), AnalysisConfig::default());
//! ```

pub mod app;
pub mod events;
pub mod export;
pub mod format;
pub mod settings;
pub mod source;
pub mod trend;
pub mod ui;

pub use app::{App, View};
pub use settings::{Overrides, Settings};
pub use source::{ChannelSource, FileSource, SourceError, TableFormat, TableSource};
pub use sprintwatch_core::{Analysis, AnalysisConfig, AnalysisError, RawTable, WindowSpec};
