#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use s2m_stats::classify::ReportFile;
use s2m_stats::{NamingConvention, PatternTable, RunConfig};

pub fn patterns(convention: NamingConvention) -> PatternTable {
    PatternTable::compile(convention).expect("compile patterns")
}

/// Writes a report with a header line, `passages` data rows and a trailer line.
pub fn write_report<F>(dir: &Path, name: &str, passages: usize, columns: usize, cell: F) -> PathBuf
where
    F: Fn(usize, usize) -> f64,
{
    let mut body = String::new();
    let header: Vec<String> = (0..columns).map(|c| format!("result{c}")).collect();
    body.push_str(&header.join("\t"));
    body.push('\n');
    for passage in 0..passages {
        let row: Vec<String> = (0..columns).map(|c| cell(passage, c).to_string()).collect();
        body.push_str(&row.join("\t"));
        body.push('\n');
    }
    body.push_str("# end of report\n");
    let path = dir.join(name);
    fs::write(&path, body).expect("write report");
    path
}

/// Writes a report with the given raw body.
pub fn write_raw(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write raw report");
    path
}

/// Run config whose log, output and stat paths live under `root`.
pub fn config_in(root: &Path, data_dir: &Path) -> RunConfig {
    RunConfig {
        data_dir: data_dir.to_path_buf(),
        stat_dir: root.join("Statfiles"),
        log_path: root.join("calculate_stats.log"),
        out_path: root.join("calculate_stats.out"),
        chatty: false,
        log_level: "debug".to_string(),
        ..RunConfig::default()
    }
}

pub fn report_file(patterns: &PatternTable, dir: &Path, name: &str) -> ReportFile {
    let classification = s2m_stats::classify(patterns, name).expect("classifiable fixture");
    ReportFile {
        name: name.to_string(),
        path: dir.join(name),
        family: classification.family,
        parameter: classification.parameter,
        replicate: patterns.replicate_index(name),
    }
}
