use std::fs;

use criterion::{criterion_group, criterion_main, Criterion};
use s2m_stats::group::ReplicateSet;
use s2m_stats::{aggregate, aggregate_matrices, classify, ParameterFamily, PatternTable, ReportFile};
use tempfile::tempdir;

const REPLICATES: usize = 10;
const PASSAGES: usize = 200;
const COLUMNS: usize = 12;

fn matrices() -> Vec<Vec<Vec<f64>>> {
    (0..REPLICATES)
        .map(|rep| {
            (0..PASSAGES)
                .map(|passage| {
                    (0..COLUMNS)
                        .map(|column| ((rep * 31 + passage * 7 + column) % 97) as f64 * 0.25)
                        .collect()
                })
                .collect()
        })
        .collect()
}

fn bench_in_memory(c: &mut Criterion) {
    let data = matrices();
    c.bench_function("aggregate_matrices", |b| {
        b.iter(|| {
            aggregate_matrices(ParameterFamily::Synergy, "2", &data, PASSAGES).expect("aggregate")
        });
    });
}

fn bench_from_disk(c: &mut Criterion) {
    let dir = tempdir().expect("bench dir");
    let patterns = PatternTable::compile(Default::default()).expect("patterns");
    let mut files = Vec::with_capacity(REPLICATES);
    for (rep, matrix) in matrices().iter().enumerate() {
        let name = format!("fitness2-s2_rep{}.report", rep + 1);
        let mut body = String::from("header\n");
        for row in matrix {
            let cells: Vec<String> = row.iter().map(f64::to_string).collect();
            body.push_str(&cells.join("\t"));
            body.push('\n');
        }
        body.push_str("trailer\n");
        let path = dir.path().join(&name);
        fs::write(&path, body).expect("write report");
        let classification = classify(&patterns, &name).expect("classify");
        files.push(ReportFile {
            replicate: patterns.replicate_index(&name),
            name,
            path,
            family: classification.family,
            parameter: classification.parameter,
        });
    }
    let set = ReplicateSet {
        family: ParameterFamily::Synergy,
        parameter: "2".to_string(),
        files,
    };
    c.bench_function("aggregate_from_disk", |b| {
        b.iter(|| aggregate(&set, PASSAGES).expect("aggregate"));
    });
}

criterion_group!(benches, bench_in_memory, bench_from_disk);
criterion_main!(benches);
