//! Batch runs driven by [`CensusConfig`].

use std::ffi::OsString;
use std::path::Path;

use tracing::{debug, info};

use crate::config::CensusConfig;
use crate::error::Result;
use crate::plot::plot_summary;
use crate::report::BatchReport;
use crate::scan::summarize_folder_to_file_excluding;

/// Runs every configured pass in order, plotting each summary when enabled.
///
/// Directories directly under the root that receive a summary or chart are
/// not scanned as samples. Stops at the first failing pass.
pub fn run_batch(config: &CensusConfig) -> Result<BatchReport> {
    let exclude = output_dirs_in_root(config);
    let mut report = BatchReport::default();
    for pass in &config.passes {
        let summary = config.summary_path(pass);
        let scan = summarize_folder_to_file_excluding(
            &config.root,
            pass.log_kind,
            pass.mode,
            Some(&summary),
            &exclude,
        )?;
        report.scans.push(scan);

        if config.plot {
            let chart = config.chart_path(pass);
            report
                .plots
                .push(plot_summary(&summary, pass.mode, Some(&chart))?);
        }
    }
    info!(passes = config.passes.len(), "batch complete");
    Ok(report)
}

/// Names of root entries that contain a batch output file.
fn output_dirs_in_root(config: &CensusConfig) -> Vec<OsString> {
    let Ok(root) = config.root.canonicalize() else {
        return Vec::new();
    };
    let mut outputs = Vec::new();
    for pass in &config.passes {
        outputs.push(config.summary_path(pass));
        if config.plot {
            outputs.push(config.chart_path(pass));
        }
    }

    let mut names = Vec::new();
    for output in &outputs {
        let Some(dir) = output.parent() else {
            continue;
        };
        if let Some(name) = child_of(&root, dir) {
            if !names.contains(&name) {
                debug!(dir = %dir.display(), "excluding output directory from scans");
                names.push(name);
            }
        }
    }
    names
}

/// The entry of `root` that `dir` lies in, if `dir` is below `root`.
fn child_of(root: &Path, dir: &Path) -> Option<OsString> {
    dir.ancestors().find_map(|ancestor| {
        let parent = ancestor.parent()?;
        let is_root = parent.canonicalize().is_ok_and(|parent| parent == root);
        if is_root {
            ancestor.file_name().map(ToOwned::to_owned)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_chart_dir_under_root_is_excluded() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = CensusConfig::new(tmp.path());
        config.chart_dir = Some("charts/nested".into());
        assert_eq!(output_dirs_in_root(&config), vec![OsString::from("charts")]);
    }

    #[test]
    fn test_default_outputs_exclude_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let config = CensusConfig::new(tmp.path());
        assert!(output_dirs_in_root(&config).is_empty());
    }

    #[test]
    fn test_chart_dir_does_not_become_a_sample() {
        let tmp = tempfile::tempdir().unwrap();
        let sample = tmp.path().join("s1");
        fs::create_dir_all(&sample).unwrap();
        fs::write(sample.join("build.log"), "Successfully built").unwrap();
        fs::write(sample.join("run.log"), "START\nok").unwrap();
        let mut config = CensusConfig::new(tmp.path());
        config.chart_dir = Some("charts".into());

        let report = run_batch(&config).unwrap();
        assert!(tmp.path().join("charts").join("summary_build.svg").exists());
        for scan in &report.scans {
            assert_eq!(scan.rows, 1);
            assert_eq!(scan.unavailable, 0);
        }
        let run = report.plots[1].counts();
        assert_eq!(run.count("unavailable"), 0);
        assert_eq!(run.count("no_error"), 1);
    }
}
