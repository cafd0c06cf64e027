#![doc = "Replicate discovery, grouping and cross-replicate statistics for S2M report files."]

/// Per-cell cross-replicate statistics.
pub mod aggregate;
/// Filename classification into parameter families.
pub mod classify;
/// Run configuration loading.
pub mod config;
/// Run-scoped log and output handles.
pub mod context;
/// Report-file discovery.
pub mod discover;
/// Statistics artifact writers.
pub mod emit;
/// Replicate set construction.
pub mod group;
/// Filename conventions and their pattern tables.
pub mod naming;
/// End-to-end run driver.
pub mod pipeline;
/// Canonical JSON and YAML helpers.
pub mod serde;
/// Passage-count consistency checks.
pub mod validate;

pub use aggregate::{aggregate, aggregate_matrices, StatisticsRow, StatisticsTable, Summary};
pub use classify::{classify, ClassifiedFiles, ParameterFamily, ReportFile, Unclassified};
pub use config::{load_config, RunConfig};
pub use context::RunContext;
pub use discover::{discover_reports, Discovery};
pub use emit::{artifact_name, render_table, write_table};
pub use group::{group_all, group_family, ReplicateSet};
pub use naming::{NamingConvention, PatternTable};
pub use pipeline::{run, run_with_counter, GroupOutcome, RunOutcome, RunSummary};
pub use validate::{
    check_consistency, ConsistencyReport, LineCounter, NativeLineCounter, OVERHEAD_LINES,
};
