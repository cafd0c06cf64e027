use std::fs;
use std::path::{Path, PathBuf};

use s2m_core::errors::{ErrorInfo, S2mError};
use serde::{Deserialize, Serialize};

use crate::naming::NamingConvention;
use crate::serde::from_yaml_slice;

/// Report directory used when none is given on the command line.
pub const DEFAULT_DATA_DIR: &str = "./Reportfiles/";
/// Statistics directory used when none is given on the command line.
pub const DEFAULT_STAT_DIR: &str = "./Statfiles/";
/// Run log created in the working directory.
pub const DEFAULT_LOG_FILE: &str = "./calculate_stats.log";
/// Run-output file created in the working directory.
pub const DEFAULT_OUT_FILE: &str = "./calculate_stats.out";

/// Settings for one statistics run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory holding the simulation report files.
    pub data_dir: PathBuf,
    /// Directory receiving one statistics file per replicate set.
    pub stat_dir: PathBuf,
    /// Filename grammar of the report files.
    pub naming: NamingConvention,
    /// Run log path, truncated at the start of every run.
    pub log_path: PathBuf,
    /// Run-output path, truncated at the start of every run.
    pub out_path: PathBuf,
    /// Echo diagnostics to stderr as well as the run log.
    pub chatty: bool,
    /// `tracing` filter directive for the run log, e.g. `info` or `debug`.
    pub log_level: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            stat_dir: PathBuf::from(DEFAULT_STAT_DIR),
            naming: NamingConvention::default(),
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            out_path: PathBuf::from(DEFAULT_OUT_FILE),
            chatty: true,
            log_level: "info".to_string(),
        }
    }
}

impl RunConfig {
    /// Config reading `data_dir` and writing into `stat_dir`, defaults elsewhere.
    pub fn for_dirs(data_dir: impl Into<PathBuf>, stat_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            stat_dir: stat_dir.into(),
            ..Self::default()
        }
    }
}

/// Loads a YAML run config; missing keys take their default values.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RunConfig, S2mError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| {
        S2mError::Config(
            ErrorInfo::new("config_read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    from_yaml_slice(&bytes)
}
