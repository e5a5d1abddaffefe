//! Report middleware configuration, optionally loaded from YAML.
//!
//! # File format
//!
//! ```yaml
//! # config/report.yaml
//!
//! # GCP project used for Cloud Trace correlation. Empty disables it.
//! project_id: my-gcp-project
//!
//! # "auto" follows NO_COLOR / CLICOLOR_FORCE / TTY detection; "never" emits plain text.
//! color: never
//!
//! # Width of the query parameter table in terminal output.
//! term_width: 100
//! ```

use std::path::Path;

use serde::Deserialize;
use tonic_report_core::TERM_WIDTH;

/// Whether terminal renderings carry ANSI styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Style output unless the environment disables it (`NO_COLOR`, no TTY).
    #[default]
    Auto,
    /// Never emit escape codes.
    Never,
}

/// Settings for [`ReportLayer`](crate::ReportLayer) and
/// [`Report`](crate::Report).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// GCP project id for the `logging.googleapis.com/trace` field.
    ///
    /// Empty disables trace correlation.
    pub project_id: String,

    /// Terminal styling.
    pub color: ColorChoice,

    /// Width of the query parameter table.
    pub term_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            color: ColorChoice::default(),
            term_width: TERM_WIDTH,
        }
    }
}

impl ReportConfig {
    /// Default config with trace correlation for `project_id`.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    /// Set the terminal styling.
    #[must_use]
    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set the query table width.
    #[must_use]
    pub fn with_term_width(mut self, term_width: usize) -> Self {
        self.term_width = term_width;
        self
    }

    /// Load config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }
}
