//! Batch configuration for scan-and-plot runs.
//!
//! # Example YAML
//!
//! ```yaml
//! root: /data/hard-gists
//! passes:
//!   - log_kind: build
//!     mode: flags
//!   - log_kind: run
//!     mode: parser
//! plot: true
//! chart_dir: charts
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use log_census_core::{ClassifierMode, LogKind};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::plot::default_chart_path;
use crate::scan::default_summary_path;

/// One scan over the sample root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassConfig {
    pub log_kind: LogKind,
    #[serde(default)]
    pub mode: ClassifierMode,
    /// Summary CSV override; defaults to `{root}/summary_{kind}.csv`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

fn default_passes() -> Vec<PassConfig> {
    vec![
        PassConfig {
            log_kind: LogKind::Build,
            mode: ClassifierMode::Flags,
            output: None,
        },
        PassConfig {
            log_kind: LogKind::Run,
            mode: ClassifierMode::Parser,
            output: None,
        },
    ]
}

fn default_plot() -> bool {
    true
}

/// Top-level batch configuration.
///
/// Without `passes`, build logs are scanned in flag mode and run logs in
/// parser mode.
///
/// # Examples
///
/// ```
/// use log_census_summary::config::CensusConfig;
///
/// let config: CensusConfig = serde_yaml::from_str("root: /data").unwrap();
/// assert_eq!(config.passes.len(), 2);
/// assert!(config.plot);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusConfig {
    /// Directory holding one subdirectory per sample.
    pub root: PathBuf,
    #[serde(default = "default_passes")]
    pub passes: Vec<PassConfig>,
    /// Render a chart after each pass.
    #[serde(default = "default_plot")]
    pub plot: bool,
    /// Directory for charts; relative paths resolve against `root`. Batch
    /// scans never treat it as a sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_dir: Option<PathBuf>,
}

impl CensusConfig {
    /// Creates a configuration with the default passes.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            passes: default_passes(),
            plot: true,
            chart_dir: None,
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::SummaryError::Io) if the file cannot be read,
    /// or [`Yaml`](crate::SummaryError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Summary CSV for `pass`.
    pub fn summary_path(&self, pass: &PassConfig) -> PathBuf {
        match &pass.output {
            Some(output) => self.root.join(output),
            None => default_summary_path(&self.root, pass.log_kind),
        }
    }

    /// Chart SVG for `pass`.
    pub fn chart_path(&self, pass: &PassConfig) -> PathBuf {
        let summary = self.summary_path(pass);
        match &self.chart_dir {
            Some(dir) => {
                let file_name = default_chart_path(&summary)
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(format!("summary_{}.svg", pass.log_kind)));
                self.root.join(dir).join(file_name)
            }
            None => default_chart_path(&summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_full_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("census.yml");
        std::fs::write(
            &path,
            "root: /data\npasses:\n  - log_kind: run\n    mode: parser\n    output: out/run.csv\nplot: false\nchart_dir: charts\n",
        )
        .unwrap();

        let config = CensusConfig::load(&path).unwrap();
        assert_eq!(config.passes.len(), 1);
        assert!(!config.plot);
        let pass = &config.passes[0];
        assert_eq!(pass.mode, ClassifierMode::Parser);
        assert_eq!(config.summary_path(pass), PathBuf::from("/data/out/run.csv"));
        assert_eq!(config.chart_path(pass), PathBuf::from("/data/charts/run.svg"));
    }

    #[test]
    fn test_pass_mode_defaults_to_flags() {
        let config: CensusConfig =
            serde_yaml::from_str("root: /data\npasses:\n  - log_kind: build\n").unwrap();
        assert_eq!(config.passes[0].mode, ClassifierMode::Flags);
        assert_eq!(
            config.summary_path(&config.passes[0]),
            PathBuf::from("/data/summary_build.csv")
        );
        assert_eq!(
            config.chart_path(&config.passes[0]),
            PathBuf::from("/data/summary_build.svg")
        );
    }

    #[test]
    fn test_new_uses_default_passes() {
        let config = CensusConfig::new("/samples");
        let parsed: CensusConfig = serde_yaml::from_str("root: /samples").unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_unknown_log_kind_is_rejected() {
        let result: std::result::Result<CensusConfig, _> =
            serde_yaml::from_str("root: /data\npasses:\n  - log_kind: deploy\n");
        assert!(result.is_err());
    }
}
