use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use s2m_core::errors::{ErrorInfo, S2mError};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::classify::ReportFile;

/// Lines in every report file that are not passages (header and trailer).
pub const OVERHEAD_LINES: usize = 2;

/// Source of total line counts for report files.
pub trait LineCounter {
    /// Returns the number of lines in the file at `path`.
    fn count_lines(&self, path: &Path) -> Result<usize, S2mError>;
}

/// Counts newline bytes directly from the file, like `wc -l`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeLineCounter;

impl LineCounter for NativeLineCounter {
    fn count_lines(&self, path: &Path) -> Result<usize, S2mError> {
        let file = File::open(path).map_err(|err| S2mError::io("line_count_open", path.display(), err))?;
        let mut reader = BufReader::new(file);
        let mut lines = 0;
        loop {
            let chunk = reader
                .fill_buf()
                .map_err(|err| S2mError::io("line_count_read", path.display(), err))?;
            if chunk.is_empty() {
                break;
            }
            lines += chunk.iter().filter(|byte| **byte == b'\n').count();
            let consumed = chunk.len();
            reader.consume(consumed);
        }
        Ok(lines)
    }
}

/// Passage count measured for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeasurement {
    /// Bare filename.
    pub name: String,
    /// Passage count, or the reason it could not be measured.
    pub passages: Result<usize, S2mError>,
}

/// Outcome of measuring every classified file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Passage count established by the first successful measurement.
    pub established: Option<usize>,
    /// False once any file mismatched or could not be measured.
    pub ok_to_proceed: bool,
    /// Per-file measurements in measurement order.
    pub measurements: Vec<FileMeasurement>,
}

impl ConsistencyReport {
    /// The validated passage count, or why grouping must not start.
    pub fn verdict(&self) -> Result<usize, S2mError> {
        match self.established {
            Some(count) if self.ok_to_proceed && count > 0 => Ok(count),
            _ => {
                let failed = self
                    .measurements
                    .iter()
                    .filter(|m| !matches!(m.passages, Ok(count) if Some(count) == self.established))
                    .count();
                Err(S2mError::Consistency(
                    ErrorInfo::new("not_ok_to_proceed", "passage counts are not consistent")
                        .with_context(
                            "established",
                            self.established
                                .map(|count| count.to_string())
                                .unwrap_or_else(|| "none".to_string()),
                        )
                        .with_context("inconsistent_files", failed.to_string())
                        .with_context("measured_files", self.measurements.len().to_string()),
                ))
            }
        }
    }

    /// Validated passage count, `None` when the run must not proceed.
    pub fn passage_count(&self) -> Option<usize> {
        self.verdict().ok()
    }
}

/// Measures every file and checks that all share the same passage count.
///
/// Every file is measured even after the first failure so the log lists all
/// offenders.
pub fn check_consistency<C>(counter: &C, files: &[ReportFile]) -> ConsistencyReport
where
    C: LineCounter + ?Sized,
{
    let mut established = None;
    let mut ok_to_proceed = true;
    let mut measurements = Vec::with_capacity(files.len());
    for file in files {
        let passages = counter.count_lines(&file.path).and_then(|lines| {
            lines.checked_sub(OVERHEAD_LINES).ok_or_else(|| {
                S2mError::Consistency(
                    ErrorInfo::new("too_few_lines", "file is shorter than its header overhead")
                        .with_context("file", file.name.clone())
                        .with_context("lines", lines.to_string()),
                )
            })
        });
        match &passages {
            Ok(count) => match established {
                None => {
                    info!(file = %file.name, passages = count, "established passage count");
                    established = Some(*count);
                }
                Some(expected) if expected != *count => {
                    warn!(
                        file = %file.name,
                        passages = count,
                        expected,
                        "inconsistency in passage count between files"
                    );
                    ok_to_proceed = false;
                }
                Some(_) => {}
            },
            Err(err) => {
                error!(file = %file.name, error = %err, "problem in finding number of lines");
                ok_to_proceed = false;
            }
        }
        measurements.push(FileMeasurement {
            name: file.name.clone(),
            passages,
        });
    }
    if established.map_or(true, |count| count == 0) {
        ok_to_proceed = false;
    }
    ConsistencyReport {
        established,
        ok_to_proceed,
        measurements,
    }
}
