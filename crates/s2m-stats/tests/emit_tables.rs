use std::fs;

use s2m_stats::{aggregate_matrices, artifact_name, render_table, write_table, ParameterFamily};
use tempfile::tempdir;

fn sample_table() -> s2m_stats::StatisticsTable {
    // Two replicates, three passages, two columns.
    let matrices = vec![
        vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]],
        vec![vec![3.0, 10.0], vec![4.0, 40.0], vec![5.0, 50.0]],
    ];
    aggregate_matrices(ParameterFamily::ErrorRate, "0.01", &matrices, 3).expect("table")
}

#[test]
fn artifact_names_are_deterministic() {
    assert_eq!(
        artifact_name(ParameterFamily::Accelerator, "2"),
        "accelerator_2.stats.tsv"
    );
    assert_eq!(
        artifact_name(ParameterFamily::BaselineFitness1, "default"),
        "fitness1_default.stats.tsv"
    );
    assert_eq!(
        artifact_name(ParameterFamily::ErrorRate, "../x"),
        "error_.._x.stats.tsv"
    );
}

#[test]
fn writes_header_then_one_block_per_column() {
    let dir = tempdir().expect("tmp dir");
    let stat_dir = dir.path().join("Statfiles");
    let path = write_table(&stat_dir, &sample_table()).expect("write");
    assert_eq!(path, stat_dir.join("error_0.01.stats.tsv"));

    let text = fs::read_to_string(&path).expect("read back");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1 + 3 * 2);
    assert_eq!(lines[0], "column\tpassage\tmin\tmax\tmean\tmedian\tstddev");
    assert_eq!(lines[1], "0\t0\t1\t3\t2\t2\t1");
    assert_eq!(lines[3], "0\t2\t3\t5\t4\t4\t1");
    assert_eq!(lines[4], "1\t0\t10\t10\t10\t10\t0");
    assert_eq!(lines[5], "1\t1\t20\t40\t30\t30\t10");
    for line in &lines[1..] {
        assert_eq!(line.split('\t').count(), 7);
    }
}

#[test]
fn rewriting_a_table_replaces_the_file() {
    let dir = tempdir().expect("tmp dir");
    let table = sample_table();
    write_table(dir.path(), &table).expect("first write");
    let path = write_table(dir.path(), &table).expect("second write");
    let text = fs::read_to_string(path).expect("read back");
    assert_eq!(text.lines().count(), 7);
}

#[test]
fn rendering_lists_every_cell() {
    let text = render_table(&sample_table());
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("== error = 0.01 (2 replicates, 3 passages, 2 columns)")
    );
    assert_eq!(text.matches("-- column").count(), 2);
    assert!(text.contains("-- column 1"));
    // One heading line per column plus one line per passage.
    assert_eq!(text.lines().count(), 1 + 2 * (2 + 3));
}
