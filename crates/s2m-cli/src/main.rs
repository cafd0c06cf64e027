use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use s2m_core::errors::S2mError;
use s2m_stats::{load_config, run, NamingConvention, RunConfig, RunContext, RunOutcome};
use tracing::{info, warn};

mod info;

use info::Topic;

const EXIT_HALTED: u8 = 1;
const EXIT_SETUP: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "calculate-stats",
    version,
    about = "Cross-replicate statistics for S2M simulation reports"
)]
struct Cli {
    /// Report directory, or one of `help`, `input`, `usage`.
    data_dir: Option<String>,
    /// Directory receiving the statistics files.
    stat_dir: Option<PathBuf>,
    /// Filename convention of the report files.
    #[arg(long, value_enum)]
    naming: Option<NamingArg>,
    /// YAML run configuration; positional arguments and flags override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write diagnostics to the run log only.
    #[arg(long)]
    quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum NamingArg {
    Hyphenated,
    Underscored,
}

impl From<NamingArg> for NamingConvention {
    fn from(value: NamingArg) -> Self {
        match value {
            NamingArg::Hyphenated => NamingConvention::Hyphenated,
            NamingArg::Underscored => NamingConvention::Underscored,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("calculate-stats: {err}");
            ExitCode::from(EXIT_SETUP)
        }
    }
}

fn execute(cli: &Cli) -> Result<ExitCode, Box<dyn Error>> {
    if let Some(topic) = cli.data_dir.as_deref().and_then(Topic::from_keyword) {
        print!("{}", topic.text());
        return Ok(ExitCode::SUCCESS);
    }

    let config = resolve_config(cli)?;
    let mut ctx = RunContext::open(&config)?;
    info!(arguments = env::args_os().skip(1).count(), "calculate-stats started");
    if cli.data_dir.is_some() && config.data_dir.is_relative() {
        warn!(
            data_dir = %config.data_dir.display(),
            "data directory is not fully qualified; resolving against the working directory"
        );
    }

    let outcome = run(&config, &mut ctx)?;
    let summary = outcome.summary();
    println!("{}", summary.status_line());
    if summary.classification_failure_count() > 0 {
        println!(
            "Classification failures: {}",
            summary.classification_failure_count()
        );
    }
    ctx.close()?;

    Ok(match outcome {
        RunOutcome::Completed(_) => ExitCode::SUCCESS,
        RunOutcome::Halted(_) => ExitCode::from(EXIT_HALTED),
    })
}

/// Config file first, then positional arguments and flags on top.
fn resolve_config(cli: &Cli) -> Result<RunConfig, S2mError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RunConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = Path::new(data_dir).to_path_buf();
    }
    if let Some(stat_dir) = &cli.stat_dir {
        config.stat_dir = stat_dir.clone();
    }
    if let Some(naming) = cli.naming {
        config.naming = naming.into();
    }
    if cli.quiet {
        config.chatty = false;
    }
    Ok(config)
}
