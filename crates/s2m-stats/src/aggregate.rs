use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use s2m_core::errors::{ErrorInfo, S2mError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::ParameterFamily;
use crate::group::ReplicateSet;

/// Descriptive statistics of one cell across the replicates of a set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median; mean of the two central values for an even count.
    pub median: f64,
    /// Population standard deviation (divisor = number of values).
    pub std_dev: f64,
}

impl Summary {
    /// Summarises `values`; `None` when there are no values or any value is
    /// NaN or infinite.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() || !values.iter().all(|value| value.is_finite()) {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        // Summation rounding may land the mean an ulp outside the range.
        let mean = (sorted.iter().sum::<f64>() / sorted.len() as f64).clamp(min, max);
        Some(Self {
            min,
            max,
            mean,
            median: median(&sorted),
            std_dev: population_std_dev(&sorted, mean),
        })
    }
}

/// Median of already sorted values.
pub fn median(sorted: &[f64]) -> f64 {
    let len = sorted.len();
    if len == 0 {
        return f64::NAN;
    }
    let mid = len / 2;
    if len % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Standard deviation with divisor `values.len()`.
pub fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let sum_sq: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Statistics of one (passage, column) cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRow {
    /// Zero-based passage index.
    pub passage: usize,
    /// Zero-based result column index.
    pub column: usize,
    /// Cross-replicate statistics.
    pub summary: Summary,
}

/// All statistics rows of one replicate set, one block per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsTable {
    /// Family of the replicate set.
    pub family: ParameterFamily,
    /// Parameter value shared by the replicates.
    pub parameter: String,
    /// Number of replicate files aggregated.
    pub replicates: usize,
    /// Passages per replicate.
    pub passage_count: usize,
    /// Result columns per passage.
    pub column_count: usize,
    /// Column-major: rows `[c * passage_count, (c + 1) * passage_count)` belong to column `c`.
    pub rows: Vec<StatisticsRow>,
}

impl StatisticsTable {
    /// Rows of `column` ordered by passage.
    pub fn column_block(&self, column: usize) -> &[StatisticsRow] {
        if column >= self.column_count {
            return &[];
        }
        let start = column * self.passage_count;
        &self.rows[start..start + self.passage_count]
    }

    /// Statistics of one cell.
    pub fn row(&self, passage: usize, column: usize) -> Option<&StatisticsRow> {
        if passage >= self.passage_count {
            return None;
        }
        self.column_block(column).get(passage)
    }
}

/// Passage rows of one replicate: `rows[passage][column]`.
pub type PassageMatrix = Vec<Vec<f64>>;

/// Reads the `passage_count` data lines following the header line of `path`.
pub fn read_passages(path: &Path, passage_count: usize) -> Result<PassageMatrix, S2mError> {
    let file = File::open(path).map_err(|err| S2mError::io("report_open", path.display(), err))?;
    let mut lines = BufReader::new(file).lines().skip(1);
    let mut rows = Vec::with_capacity(passage_count);
    for passage in 0..passage_count {
        let line = lines
            .next()
            .ok_or_else(|| {
                S2mError::Parse(
                    ErrorInfo::new("passage_missing", "report ends before the expected passage")
                        .with_context("path", path.display().to_string())
                        .with_context("passage", passage.to_string()),
                )
            })?
            .map_err(|err| S2mError::io("report_read", path.display(), err))?;
        let row = parse_passage_line(&line)
            .map_err(|err| annotate(err, "path", path.display()))
            .map_err(|err| annotate(err, "passage", passage))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parses one data line; cells are separated by whitespace, tabs or commas.
///
/// `nan` and `inf` spellings are rejected like any other non-numeric cell.
pub fn parse_passage_line(line: &str) -> Result<Vec<f64>, S2mError> {
    let values = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|cell| !cell.is_empty())
        .enumerate()
        .map(|(column, cell)| {
            let not_numeric = |message: String| {
                S2mError::Parse(
                    ErrorInfo::new("cell_not_numeric", message)
                        .with_context("column", column.to_string())
                        .with_context("cell", cell),
                )
            };
            let value = cell
                .parse::<f64>()
                .map_err(|err| not_numeric(err.to_string()))?;
            if !value.is_finite() {
                return Err(not_numeric("cell is not a finite number".to_string()));
            }
            Ok(value)
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        return Err(S2mError::Parse(ErrorInfo::new(
            "row_empty",
            "passage line has no values",
        )));
    }
    Ok(values)
}

/// Reads every member of `set` and computes its statistics table.
pub fn aggregate(set: &ReplicateSet, passage_count: usize) -> Result<StatisticsTable, S2mError> {
    let matrices = set
        .files
        .iter()
        .map(|file| read_passages(&file.path, passage_count))
        .collect::<Result<Vec<_>, _>>()?;
    aggregate_matrices(set.family, &set.parameter, &matrices, passage_count)
}

/// Computes statistics over already parsed replicate matrices.
///
/// Every row of every matrix must have the column count of the first row of
/// the first matrix.
pub fn aggregate_matrices(
    family: ParameterFamily,
    parameter: &str,
    matrices: &[PassageMatrix],
    passage_count: usize,
) -> Result<StatisticsTable, S2mError> {
    let schema_error = |code: &str, message: &str| {
        S2mError::Parse(
            ErrorInfo::new(code, message)
                .with_context("family", family.slug())
                .with_context("parameter", parameter),
        )
    };
    if matrices.is_empty() {
        return Err(schema_error("no_replicates", "replicate set has no members"));
    }
    let column_count = matrices[0].first().map(Vec::len).unwrap_or(0);
    for (replicate, matrix) in matrices.iter().enumerate() {
        if matrix.len() != passage_count {
            let err = schema_error("passage_count", "replicate has the wrong number of passages");
            return Err(annotate(err, "replicate", replicate));
        }
        if let Some(passage) = matrix.iter().position(|row| row.len() != column_count) {
            let err = schema_error("column_count", "replicate rows differ in column count");
            return Err(annotate(annotate(err, "replicate", replicate), "passage", passage));
        }
        if let Some(passage) = matrix
            .iter()
            .position(|row| row.iter().any(|value| !value.is_finite()))
        {
            let err = schema_error("cell_not_numeric", "replicate holds a non-finite value");
            return Err(annotate(annotate(err, "replicate", replicate), "passage", passage));
        }
    }

    let mut rows = Vec::with_capacity(passage_count * column_count);
    let mut values = Vec::with_capacity(matrices.len());
    for column in 0..column_count {
        for passage in 0..passage_count {
            values.clear();
            values.extend(matrices.iter().map(|matrix| matrix[passage][column]));
            let summary = Summary::from_values(&values)
                .ok_or_else(|| schema_error("no_values", "cell has no values"))?;
            rows.push(StatisticsRow {
                passage,
                column,
                summary,
            });
        }
    }
    debug!(
        %family,
        parameter,
        replicates = matrices.len(),
        passage_count,
        column_count,
        "aggregated replicate set"
    );
    Ok(StatisticsTable {
        family,
        parameter: parameter.to_string(),
        replicates: matrices.len(),
        passage_count,
        column_count,
        rows,
    })
}

fn annotate(err: S2mError, key: &str, value: impl ToString) -> S2mError {
    match err {
        S2mError::Parse(info) => S2mError::Parse(info.with_context(key, value.to_string())),
        other => other,
    }
}
