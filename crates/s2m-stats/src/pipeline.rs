use std::fs;
use std::path::Path;

use s2m_core::errors::S2mError;
use s2m_core::provenance::RunProvenance;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::aggregate::aggregate;
use crate::classify::{classify_all, ClassificationFailure, ParameterFamily};
use crate::config::RunConfig;
use crate::context::RunContext;
use crate::discover::discover_reports;
use crate::emit::{render_table, write_table};
use crate::group::{group_all, ReplicateSet};
use crate::naming::{NamingConvention, PatternTable};
use crate::serde::to_canonical_json_bytes;
use crate::validate::{check_consistency, ConsistencyReport, LineCounter, NativeLineCounter};

/// Summary artifact written next to the statistics files.
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

/// What happened to one replicate set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    /// Family of the replicate set.
    pub family: ParameterFamily,
    /// Parameter value shared by the members.
    pub parameter: String,
    /// Member filenames in discovery order.
    pub files: Vec<String>,
    /// Statistics file written for the set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    /// Why no statistics file was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<S2mError>,
}

/// Everything a run decided, persisted as `run_summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Directories, timestamp and tool versions of the run.
    pub provenance: RunProvenance,
    /// Filename convention the run was configured with.
    pub naming: NamingConvention,
    /// Report-file candidates found in the data directory.
    pub discovered: usize,
    /// Directory entries that could not be listed.
    pub listing_errors: usize,
    /// Files assigned to a family.
    pub classified: usize,
    /// Report files excluded from every family.
    pub classification_failures: Vec<ClassificationFailure>,
    /// Per-file passage counts and the gate decision.
    pub consistency: ConsistencyReport,
    /// Whether every measured file agreed on a non-zero passage count.
    pub ok_to_proceed: bool,
    /// Validated passage count; absent when the run halted.
    pub passage_count: Option<usize>,
    /// One entry per replicate set, in processing order.
    pub groups: Vec<GroupOutcome>,
}

impl RunSummary {
    /// The user-facing status line; a halted run reports 0 passages.
    pub fn status_line(&self) -> String {
        format!(
            "OK to proceed: {}, Number of passages is {}",
            self.ok_to_proceed,
            self.passage_count.unwrap_or(0)
        )
    }

    /// Status line followed by the classification-failure count.
    pub fn closing_lines(&self) -> String {
        format!(
            "{}\nClassification failures: {}\n",
            self.status_line(),
            self.classification_failure_count()
        )
    }

    /// Number of report files no family accepted.
    pub fn classification_failure_count(&self) -> usize {
        self.classification_failures.len()
    }

    /// Replicate sets whose statistics file was written.
    pub fn emitted(&self) -> impl Iterator<Item = &GroupOutcome> {
        self.groups.iter().filter(|group| group.artifact.is_some())
    }
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Passage counts agreed; every replicate set was processed.
    Completed(RunSummary),
    /// Passage counts disagreed; nothing was grouped or aggregated.
    Halted(RunSummary),
}

impl RunOutcome {
    /// Summary of the run regardless of how it ended.
    pub fn summary(&self) -> &RunSummary {
        match self {
            RunOutcome::Completed(summary) | RunOutcome::Halted(summary) => summary,
        }
    }

    /// Whether the consistency gate let the run through.
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

/// Runs the pipeline with native line counting.
pub fn run(config: &RunConfig, ctx: &mut RunContext) -> Result<RunOutcome, S2mError> {
    run_with_counter(config, &NativeLineCounter, ctx)
}

/// Discovers, classifies, validates, groups, aggregates and emits.
///
/// Only setup failures (pattern compilation, run-output writes) are returned
/// as errors. Everything else is logged and recorded in the summary.
pub fn run_with_counter<C>(
    config: &RunConfig,
    counter: &C,
    ctx: &mut RunContext,
) -> Result<RunOutcome, S2mError>
where
    C: LineCounter + ?Sized,
{
    let patterns = PatternTable::compile(config.naming)?;
    info!(
        data_dir = %config.data_dir.display(),
        stat_dir = %config.stat_dir.display(),
        naming = %patterns.convention(),
        "processing files from directory"
    );

    let discovery = discover_reports(&config.data_dir, &patterns);
    let classified = classify_all(&patterns, &config.data_dir, &discovery.names);
    for family in ParameterFamily::ALL {
        let members: Vec<&str> = classified
            .in_family(family)
            .map(|file| file.name.as_str())
            .collect();
        info!(%family, ?members, "report files");
    }
    if !classified.failures.is_empty() {
        warn!(
            count = classified.failures.len(),
            "report files excluded by classification"
        );
    }

    let consistency = check_consistency(counter, &classified.files);
    let mut summary = RunSummary {
        provenance: RunProvenance::capture(
            config.data_dir.display().to_string(),
            config.stat_dir.display().to_string(),
        )
        .with_tool("s2m-stats", env!("CARGO_PKG_VERSION")),
        naming: config.naming,
        discovered: discovery.names.len(),
        listing_errors: discovery.listing_errors,
        classified: classified.files.len(),
        classification_failures: classified.failures.clone(),
        ok_to_proceed: consistency.ok_to_proceed,
        passage_count: None,
        consistency,
        groups: Vec::new(),
    };
    let verdict = summary.consistency.verdict();
    summary.passage_count = verdict.as_ref().ok().copied();
    info!("{}", summary.status_line());

    let passage_count = match verdict {
        Ok(count) => count,
        Err(err) => {
            error!(error = %err, "halting before grouping");
            ctx.write_output(&summary.closing_lines())?;
            persist_summary(&config.stat_dir, &summary);
            return Ok(RunOutcome::Halted(summary));
        }
    };

    let sets = match group_all(&patterns, &classified) {
        Ok(sets) => sets,
        Err(err) => {
            error!(error = %err, "grouping failed");
            Vec::new()
        }
    };
    for set in &sets {
        let outcome = process_set(set, passage_count, &config.stat_dir, ctx)?;
        summary.groups.push(outcome);
    }

    ctx.write_output(&summary.closing_lines())?;
    persist_summary(&config.stat_dir, &summary);
    Ok(RunOutcome::Completed(summary))
}

fn process_set(
    set: &ReplicateSet,
    passage_count: usize,
    stat_dir: &Path,
    ctx: &mut RunContext,
) -> Result<GroupOutcome, S2mError> {
    let mut outcome = GroupOutcome {
        family: set.family,
        parameter: set.parameter.clone(),
        files: set.files.iter().map(|file| file.name.clone()).collect(),
        artifact: None,
        error: None,
    };
    let table = match aggregate(set, passage_count) {
        Ok(table) => table,
        Err(err) => {
            error!(family = %set.family, parameter = %set.parameter, error = %err, "aggregation failed");
            outcome.error = Some(err);
            return Ok(outcome);
        }
    };
    match write_table(stat_dir, &table) {
        Ok(path) => outcome.artifact = Some(path.display().to_string()),
        Err(err) => {
            error!(family = %set.family, parameter = %set.parameter, error = %err, "emission failed");
            outcome.error = Some(err);
        }
    }
    ctx.write_output(&render_table(&table))?;
    Ok(outcome)
}

fn persist_summary(stat_dir: &Path, summary: &RunSummary) {
    let result = fs::create_dir_all(stat_dir)
        .map_err(|err| S2mError::io("stat_dir_create", stat_dir.display(), err))
        .and_then(|_| to_canonical_json_bytes(summary))
        .and_then(|bytes| {
            let path = stat_dir.join(RUN_SUMMARY_FILE);
            fs::write(&path, bytes).map_err(|err| S2mError::io("summary_write", path.display(), err))
        });
    if let Err(err) = result {
        warn!(error = %err, "could not persist run summary");
    }
}
