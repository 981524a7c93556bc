//! Folder aggregation: one summary row per sample directory.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use log_census_core::{ClassifierMode, LogKind, LogRecord, Verdict, classify};
use tracing::{debug, info};

use crate::error::Result;
use crate::report::ScanReport;
use crate::table::write_summary;

/// Marker a `run` log must contain to count as an actual execution.
pub const START_SENTINEL: &str = "START";

/// Classifies the `kind` log of one sample directory.
///
/// Returns `Ok(None)` when the log is unavailable: missing, empty, or a
/// `run` log without [`START_SENTINEL`]. Invalid UTF-8 is decoded lossily.
///
/// # Errors
///
/// Any filesystem error other than the log being absent.
pub fn summarize_log(
    sample_dir: &Path,
    kind: LogKind,
    mode: ClassifierMode,
) -> Result<Option<Verdict>> {
    let log_path = sample_dir.join(kind.log_file_name());
    let metadata = match fs::metadata(&log_path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %log_path.display(), "log missing");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    if metadata.len() == 0 {
        debug!(path = %log_path.display(), "log empty");
        return Ok(None);
    }

    let bytes = fs::read(&log_path)?;
    let text = String::from_utf8_lossy(&bytes);
    if kind == LogKind::Run && !text.contains(START_SENTINEL) {
        debug!(path = %log_path.display(), "run log has no start marker");
        return Ok(None);
    }

    Ok(Some(classify(&text, mode)))
}

/// Summarizes every sample directory directly under `root`.
///
/// Records follow `read_dir` order, which is platform dependent. Entries
/// that are not directories are skipped.
///
/// # Errors
///
/// The first filesystem error aborts the scan; there is no per-sample
/// recovery.
pub fn summarize_folder(
    root: &Path,
    kind: LogKind,
    mode: ClassifierMode,
) -> Result<Vec<LogRecord>> {
    summarize_folder_excluding(root, kind, mode, &[])
}

/// Like [`summarize_folder`], but skips the directories named in `exclude`.
pub(crate) fn summarize_folder_excluding(
    root: &Path,
    kind: LogKind,
    mode: ClassifierMode,
    exclude: &[OsString],
) -> Result<Vec<LogRecord>> {
    let mut records = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if exclude.contains(&name) {
            debug!(path = %path.display(), "skipping output directory");
            continue;
        }
        let sample_id = name.to_string_lossy().into_owned();
        let mut record = LogRecord::unavailable(sample_id, path, kind);
        record.verdict = summarize_log(&record.path, kind, mode)?;
        debug!(
            sample = %record.sample_id,
            available = record.is_available(),
            "summarized sample"
        );
        records.push(record);
    }
    Ok(records)
}

/// Default summary location: `{root}/summary_{kind}.csv`.
pub fn default_summary_path(root: &Path, kind: LogKind) -> PathBuf {
    root.join(kind.summary_file_name())
}

/// Scans `root` and writes the summary table, replacing any previous file.
///
/// `output` defaults to [`default_summary_path`].
pub fn summarize_folder_to_file(
    root: &Path,
    kind: LogKind,
    mode: ClassifierMode,
    output: Option<&Path>,
) -> Result<ScanReport> {
    summarize_folder_to_file_excluding(root, kind, mode, output, &[])
}

pub(crate) fn summarize_folder_to_file_excluding(
    root: &Path,
    kind: LogKind,
    mode: ClassifierMode,
    output: Option<&Path>,
    exclude: &[OsString],
) -> Result<ScanReport> {
    let output = output.map_or_else(|| default_summary_path(root, kind), Path::to_path_buf);
    let records = summarize_folder_excluding(root, kind, mode, exclude)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(&output)?;
    write_summary(&records, mode, BufWriter::new(file))?;

    let report = ScanReport::new(root, kind, mode, &output, &records);
    info!(
        root = %root.display(),
        log_kind = %kind,
        rows = report.rows,
        available = report.available,
        output = %output.display(),
        "scan complete"
    );
    Ok(report)
}
