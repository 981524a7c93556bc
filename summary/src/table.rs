//! CSV summary tables: writing scan records and reading them back.
//!
//! Column layout is `gist_id, path, log_type, available` followed by the
//! verdict columns of the mode: the 19 keywords in flag mode, `error_type`
//! in parser mode. Booleans are written as `True` / `False`; an unavailable
//! record leaves every verdict cell empty.

use std::fs::File;
use std::io;
use std::path::Path;

use log_census_core::{ClassifierMode, ERROR_TYPE_COLUMN, LogRecord, STANDARD_COLUMNS, Verdict};
use tracing::debug;

use crate::error::{Result, SummaryError};

/// Cell text for a true boolean.
pub const TRUE_CELL: &str = "True";
/// Cell text for a false boolean.
pub const FALSE_CELL: &str = "False";

fn bool_cell(value: bool) -> &'static str {
    if value { TRUE_CELL } else { FALSE_CELL }
}

/// Header row written for `mode`.
pub fn header(mode: ClassifierMode) -> Vec<&'static str> {
    let mut columns = STANDARD_COLUMNS.to_vec();
    columns.extend(mode.verdict_columns());
    columns
}

/// Renders one record as a row matching [`header`].
///
/// # Errors
///
/// Returns [`SummaryError::InvalidInput`] when the record carries a verdict
/// from the other mode.
pub fn record_cells(record: &LogRecord, mode: ClassifierMode) -> Result<Vec<String>> {
    let mut cells = vec![
        record.sample_id.clone(),
        record.path.display().to_string(),
        record.log_kind.to_string(),
        bool_cell(record.is_available()).to_string(),
    ];

    match (&record.verdict, mode) {
        (None, _) => {
            cells.extend(std::iter::repeat_n(String::new(), mode.verdict_columns().len()));
        }
        (Some(Verdict::Flags(flags)), ClassifierMode::Flags) => {
            cells.extend(flags.as_slice().iter().map(|hit| bool_cell(*hit).to_string()));
        }
        (Some(Verdict::Category(category)), ClassifierMode::Parser) => {
            cells.push(category.to_string());
        }
        (Some(verdict), _) => {
            return Err(SummaryError::InvalidInput(format!(
                "record '{}' has a {:?} verdict but the table is in {:?} mode",
                record.sample_id,
                verdict.mode(),
                mode
            )));
        }
    }
    Ok(cells)
}

/// Writes the header and one row per record.
pub fn write_summary<W: io::Write>(
    records: &[LogRecord],
    mode: ClassifierMode,
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(header(mode))?;
    for record in records {
        csv_writer.write_record(record_cells(record, mode)?)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Availability recorded in a row's `available` cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
    /// Neither `true` nor `false` after trimming and lowercasing.
    Unknown,
}

impl Availability {
    pub fn parse(cell: &str) -> Self {
        match cell.trim().to_lowercase().as_str() {
            "true" => Self::Available,
            "false" => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

/// Returns `true` if a boolean cell reads as true.
pub fn is_true_cell(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case(TRUE_CELL)
}

/// One parsed row of a summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub gist_id: String,
    pub path: String,
    pub log_type: String,
    pub available: Availability,
    /// Cells in the order of [`SummaryTable::verdict_columns`].
    pub verdict_cells: Vec<String>,
}

/// A summary table read back for plotting.
#[derive(Debug, Clone)]
pub struct SummaryTable {
    pub mode: ClassifierMode,
    pub verdict_columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
    /// Malformed rows dropped while reading.
    pub skipped_rows: usize,
}

/// Column positions resolved from a header row.
struct Layout {
    width: usize,
    standard: [Option<usize>; 4],
    verdict: Vec<usize>,
    padded: bool,
}

impl Layout {
    fn for_flags(header: &csv::StringRecord) -> Self {
        let mut standard = [None; 4];
        let mut verdict = Vec::new();
        for (idx, name) in header.iter().enumerate() {
            match STANDARD_COLUMNS.iter().position(|c| *c == name) {
                Some(slot) => standard[slot] = standard[slot].or(Some(idx)),
                None => verdict.push(idx),
            }
        }
        Self {
            width: header.len(),
            standard,
            verdict,
            padded: true,
        }
    }

    fn for_parser() -> Self {
        Self {
            width: STANDARD_COLUMNS.len() + 1,
            standard: [Some(0), Some(1), Some(2), Some(3)],
            verdict: vec![STANDARD_COLUMNS.len()],
            padded: false,
        }
    }

    /// Flag rows may be short (missing cells read as empty) but never wider
    /// than the header.
    fn accepts(&self, record: &csv::StringRecord) -> bool {
        if self.padded {
            record.len() <= self.width
        } else {
            record.len() >= self.width
        }
    }

    fn cell(record: &csv::StringRecord, idx: Option<usize>) -> String {
        idx.and_then(|i| record.get(i)).unwrap_or_default().to_string()
    }

    fn row(&self, record: &csv::StringRecord) -> SummaryRow {
        SummaryRow {
            gist_id: Self::cell(record, self.standard[0]),
            path: Self::cell(record, self.standard[1]),
            log_type: Self::cell(record, self.standard[2]),
            available: Availability::parse(&Self::cell(record, self.standard[3])),
            verdict_cells: self
                .verdict
                .iter()
                .map(|idx| Self::cell(record, Some(*idx)))
                .collect(),
        }
    }
}

impl SummaryTable {
    /// Reads a summary CSV from disk.
    pub fn read(path: impl AsRef<Path>, mode: ClassifierMode) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, mode)
    }

    /// Reads a summary table produced in `mode`.
    ///
    /// In flag mode the file's own header decides the columns, and every
    /// column outside `gist_id, path, log_type, available` is a keyword
    /// column, and short rows are padded with empty cells. In parser mode
    /// the header row is replaced by the fixed
    /// five-column layout and only the first five fields of each row are
    /// used.
    ///
    /// Rows that do not fit the layout, or that cannot be decoded, are
    /// skipped and counted in [`skipped_rows`](Self::skipped_rows).
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::InvalidInput`] if there is no header row, and
    /// [`SummaryError::Csv`] for underlying I/O failures.
    pub fn from_reader<R: io::Read>(reader: R, mode: ClassifierMode) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = csv_reader.records();

        let header = match records.next() {
            Some(result) => result?,
            None => {
                return Err(SummaryError::InvalidInput(
                    "summary table has no header row".to_string(),
                ));
            }
        };

        let (layout, verdict_columns) = match mode {
            ClassifierMode::Flags => {
                let layout = Layout::for_flags(&header);
                let columns: Vec<String> = layout
                    .verdict
                    .iter()
                    .filter_map(|idx| header.get(*idx))
                    .map(ToOwned::to_owned)
                    .collect();
                (layout, columns)
            }
            ClassifierMode::Parser => (Layout::for_parser(), vec![ERROR_TYPE_COLUMN.to_string()]),
        };

        let mut rows = Vec::new();
        let mut skipped_rows = 0usize;
        for (line, result) in records.enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => return Err(err.into()),
                Err(err) => {
                    debug!(row = line + 1, error = %err, "skipping undecodable summary row");
                    skipped_rows += 1;
                    continue;
                }
            };
            if !layout.accepts(&record) {
                debug!(
                    row = line + 1,
                    fields = record.len(),
                    expected = layout.width,
                    "skipping malformed summary row"
                );
                skipped_rows += 1;
                continue;
            }
            rows.push(layout.row(&record));
        }

        Ok(Self {
            mode,
            verdict_columns,
            rows,
            skipped_rows,
        })
    }

    /// Total rows kept, available or not.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a verdict column by name.
    pub fn verdict_index(&self, column: &str) -> Option<usize> {
        self.verdict_columns.iter().position(|c| c == column)
    }
}
