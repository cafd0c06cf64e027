mod common;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use s2m_core::errors::{ErrorInfo, S2mError};
use s2m_stats::classify::ReportFile;
use s2m_stats::{check_consistency, LineCounter, NamingConvention, NativeLineCounter};
use tempfile::tempdir;

use common::{patterns, report_file, write_raw, write_report};

struct FixedCounts(HashMap<PathBuf, usize>);

impl LineCounter for FixedCounts {
    fn count_lines(&self, path: &Path) -> Result<usize, S2mError> {
        self.0.get(path).copied().ok_or_else(|| {
            S2mError::Io(
                ErrorInfo::new("missing", "no such fixture")
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

fn fixture(counts: &[Option<usize>]) -> (FixedCounts, Vec<ReportFile>) {
    let table = patterns(NamingConvention::Hyphenated);
    let dir = Path::new("/reports");
    let mut map = HashMap::new();
    let mut files = Vec::new();
    for (idx, count) in counts.iter().enumerate() {
        let file = report_file(&table, dir, &format!("fitness2-a2_rep{}.report", idx + 1));
        if let Some(count) = count {
            map.insert(file.path.clone(), *count);
        }
        files.push(file);
    }
    (FixedCounts(map), files)
}

#[test]
fn uniform_counts_establish_the_passage_count() {
    let (counter, files) = fixture(&[Some(10), Some(10), Some(10)]);
    let report = check_consistency(&counter, &files);
    assert!(report.ok_to_proceed);
    assert_eq!(report.established, Some(8));
    assert_eq!(report.verdict().expect("verdict"), 8);
    assert_eq!(report.measurements.len(), 3);
}

#[test]
fn a_single_mismatch_blocks_the_run() {
    let (counter, files) = fixture(&[Some(10), Some(10), Some(9)]);
    let report = check_consistency(&counter, &files);
    assert!(!report.ok_to_proceed);
    assert_eq!(report.passage_count(), None);
    let err = report.verdict().expect_err("mismatch must fail");
    assert!(matches!(err, S2mError::Consistency(_)));
    assert_eq!(err.info().context["inconsistent_files"], "1");
}

#[test]
fn first_successful_measurement_sets_the_expectation() {
    let (counter, files) = fixture(&[None, Some(7), Some(7)]);
    let report = check_consistency(&counter, &files);
    assert_eq!(report.established, Some(5));
    assert!(!report.ok_to_proceed, "unmeasurable file must block the run");
    assert!(report.measurements[0].passages.is_err());
}

#[test]
fn every_file_is_measured_after_a_failure() {
    let (counter, files) = fixture(&[Some(10), Some(3), None, Some(10)]);
    let report = check_consistency(&counter, &files);
    assert_eq!(report.measurements.len(), 4);
    assert_eq!(report.measurements[3].passages, Ok(8));
}

#[test]
fn header_only_files_are_not_ok() {
    let (counter, files) = fixture(&[Some(2), Some(2)]);
    let report = check_consistency(&counter, &files);
    assert_eq!(report.established, Some(0));
    assert!(!report.ok_to_proceed);
    assert!(report.verdict().is_err());
}

#[test]
fn files_shorter_than_the_overhead_fail_measurement() {
    let (counter, files) = fixture(&[Some(10), Some(1)]);
    let report = check_consistency(&counter, &files);
    assert!(!report.ok_to_proceed);
    assert!(matches!(
        report.measurements[1].passages,
        Err(S2mError::Consistency(_))
    ));
}

#[test]
fn no_files_means_nothing_to_proceed_with() {
    let (counter, files) = fixture(&[]);
    let report = check_consistency(&counter, &files);
    assert_eq!(report.established, None);
    assert!(report.verdict().is_err());
}

#[test]
fn native_counter_counts_newlines() {
    let dir = tempdir().expect("tmp dir");
    let path = write_report(dir.path(), "fitness1-default_rep1.report", 10, 3, |p, c| {
        (p * c) as f64
    });
    assert_eq!(NativeLineCounter.count_lines(&path).expect("count"), 12);

    let unterminated = write_raw(dir.path(), "partial.report", "a\nb\nc");
    assert_eq!(NativeLineCounter.count_lines(&unterminated).expect("count"), 2);

    let empty = write_raw(dir.path(), "empty.report", "");
    assert_eq!(NativeLineCounter.count_lines(&empty).expect("count"), 0);
}

#[test]
fn native_counter_reports_missing_files() {
    let dir = tempdir().expect("tmp dir");
    let err = NativeLineCounter
        .count_lines(&dir.path().join("gone.report"))
        .expect_err("missing file");
    assert!(matches!(err, S2mError::Io(_)));
}
