use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use s2m_core::errors::{ErrorInfo, S2mError};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::RunConfig;

/// Run-scoped log and output handles.
///
/// Opening the context truncates both files and installs a `tracing`
/// subscriber for the current thread that writes to the run log (and to
/// stderr when the config is chatty). Dropping it flushes the output and
/// restores the previous subscriber.
pub struct RunContext {
    output: BufWriter<File>,
    out_path: PathBuf,
    log_path: PathBuf,
    _subscriber: DefaultGuard,
}

impl RunContext {
    /// Creates the run log and run-output files named in `config`.
    pub fn open(config: &RunConfig) -> Result<Self, S2mError> {
        let log_file = File::create(&config.log_path)
            .map_err(|err| S2mError::io("log_create", config.log_path.display(), err))?;
        let output = File::create(&config.out_path)
            .map_err(|err| S2mError::io("out_create", config.out_path.display(), err))?;
        let filter = EnvFilter::try_new(&config.log_level).map_err(|err| {
            S2mError::Config(
                ErrorInfo::new("log_level", err.to_string())
                    .with_context("log_level", config.log_level.clone()),
            )
        })?;

        let log_layer = fmt::layer()
            .with_writer(Mutex::new(log_file))
            .with_ansi(false)
            .with_target(false);
        let console_layer = config.chatty.then(|| {
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time()
        });
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(log_layer)
            .with(console_layer);

        Ok(Self {
            output: BufWriter::new(output),
            out_path: config.out_path.clone(),
            log_path: config.log_path.clone(),
            _subscriber: tracing::subscriber::set_default(subscriber),
        })
    }

    /// Appends `text` to the run-output file.
    pub fn write_output(&mut self, text: &str) -> Result<(), S2mError> {
        self.output
            .write_all(text.as_bytes())
            .map_err(|err| S2mError::io("out_write", self.out_path.display(), err))
    }

    /// Path of the run-output file.
    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    /// Path of the run log.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Flushes the run-output file and releases both handles.
    pub fn close(mut self) -> Result<(), S2mError> {
        self.output
            .flush()
            .map_err(|err| S2mError::io("out_flush", self.out_path.display(), err))
    }
}

impl Drop for RunContext {
    fn drop(&mut self) {
        let _ = self.output.flush();
    }
}
