//! Layered run settings.
//!
//! Precedence, lowest to highest: built-in defaults, a TOML file
//! (`--config`, or `sprintwatch.toml` in the working directory if present),
//! `SPRINTWATCH_*` environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use sprintwatch_core::{AnalysisConfig, WindowSpec, DEFAULT_LAST_N, DEFAULT_THRESHOLD};
use tracing::info;

use crate::source::load_sprint_list;

/// Values given on the command line. `None` leaves lower layers in effect.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub threshold: Option<f64>,
    pub last_n: Option<usize>,
    pub sprints: Option<String>,
    pub sprint_list: Option<PathBuf>,
    pub coerce_numeric: bool,
}

/// Fully merged settings for one run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub threshold: f64,
    pub last_n: usize,
    /// Explicit comma-separated window.
    #[serde(default)]
    pub sprints: Option<String>,
    /// File with one curated sprint id per line.
    #[serde(default)]
    pub sprint_list: Option<PathBuf>,
    /// Write coerced point values back into the source file.
    pub coerce_numeric: bool,
}

impl Settings {
    /// Merge every layer into one `Settings`.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("threshold", DEFAULT_THRESHOLD)?
            .set_default("last_n", DEFAULT_LAST_N as u64)?
            .set_default("coerce_numeric", false)?;

        builder = match config_path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("sprintwatch").required(false)),
        };

        builder = builder
            .add_source(Environment::with_prefix("SPRINTWATCH"))
            .set_override_option("threshold", overrides.threshold)?
            .set_override_option("last_n", overrides.last_n.map(|n| n as u64))?
            .set_override_option("sprints", overrides.sprints.clone())?
            .set_override_option(
                "sprint_list",
                overrides
                    .sprint_list
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?;
        if overrides.coerce_numeric {
            builder = builder.set_override("coerce_numeric", true)?;
        }

        let settings: Settings = builder
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            anyhow::bail!("threshold must be a finite number, got {}", self.threshold);
        }
        Ok(())
    }

    /// Build the engine configuration, reading the curated list if one is set.
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let curated = match &self.sprint_list {
            Some(path) => {
                let ids = load_sprint_list(path).with_context(|| {
                    format!("Failed to read sprint list {}", path.display())
                })?;
                info!(path = %path.display(), sprints = ids.len(), "loaded curated sprint list");
                ids
            }
            None => Vec::new(),
        };

        Ok(AnalysisConfig {
            threshold: self.threshold,
            window: WindowSpec {
                explicit: self.sprints.clone().filter(|s| !s.trim().is_empty()),
                curated,
                last_n: self.last_n,
            },
        })
    }
}
