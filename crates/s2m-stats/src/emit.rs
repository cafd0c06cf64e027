use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use s2m_core::errors::{ErrorInfo, S2mError};
use tracing::info;

use crate::aggregate::StatisticsTable;
use crate::classify::ParameterFamily;

const HEADER: [&str; 7] = ["column", "passage", "min", "max", "mean", "median", "stddev"];

fn emit_error(code: &str, path: &Path, err: impl ToString) -> S2mError {
    S2mError::Emit(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
}

/// Deterministic artifact name for a replicate set.
///
/// Path separators in the parameter value are replaced so the artifact
/// always lands directly inside the statistics directory.
pub fn artifact_name(family: ParameterFamily, parameter: &str) -> String {
    let parameter: String = parameter
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}_{}.stats.tsv", family.slug(), parameter)
}

/// Writes `table` as a tab-delimited file inside `stat_dir`.
///
/// One header row, then one block per result column with rows ordered by
/// passage index.
pub fn write_table(stat_dir: &Path, table: &StatisticsTable) -> Result<PathBuf, S2mError> {
    fs::create_dir_all(stat_dir).map_err(|err| emit_error("stat_dir_create", stat_dir, err))?;
    let path = stat_dir.join(artifact_name(table.family, &table.parameter));
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&path)
        .map_err(|err| emit_error("stats_open", &path, err))?;
    writer
        .write_record(HEADER)
        .map_err(|err| emit_error("stats_write_header", &path, err))?;
    for column in 0..table.column_count {
        for row in table.column_block(column) {
            let summary = &row.summary;
            writer
                .write_record([
                    row.column.to_string(),
                    row.passage.to_string(),
                    summary.min.to_string(),
                    summary.max.to_string(),
                    summary.mean.to_string(),
                    summary.median.to_string(),
                    summary.std_dev.to_string(),
                ])
                .map_err(|err| emit_error("stats_write_row", &path, err))?;
        }
    }
    writer
        .flush()
        .map_err(|err| emit_error("stats_flush", &path, err))?;
    info!(
        family = %table.family,
        parameter = %table.parameter,
        path = %path.display(),
        rows = table.rows.len(),
        "wrote statistics file"
    );
    Ok(path)
}

/// Fixed-width rendering of `table` for the run-output file.
pub fn render_table(table: &StatisticsTable) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "== {} = {} ({} replicates, {} passages, {} columns)",
        table.family, table.parameter, table.replicates, table.passage_count, table.column_count
    );
    for column in 0..table.column_count {
        let _ = writeln!(text, "-- column {column}");
        let _ = writeln!(
            text,
            "{:>8} {:>14} {:>14} {:>14} {:>14} {:>14}",
            "passage", "min", "max", "mean", "median", "stddev"
        );
        for row in table.column_block(column) {
            let s = &row.summary;
            let _ = writeln!(
                text,
                "{:>8} {:>14.6} {:>14.6} {:>14.6} {:>14.6} {:>14.6}",
                row.passage, s.min, s.max, s.mean, s.median, s.std_dev
            );
        }
    }
    text
}
