//! Structured logging setup.

use anyhow::{Context, anyhow};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Environment variable holding the log filter (e.g. `stowage_common=debug`).
pub const LOG_ENV: &str = "STOWAGE_LOG";

/// How logs are emitted.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub verbose: bool,
    pub json: bool,
    pub file: Option<PathBuf>,
}

impl LogOptions {
    /// Filter used when `--verbose` is absent: the environment, else `info`.
    pub fn filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file sink when dropped and must be held
/// for the life of the process.
pub fn init(options: &LogOptions) -> anyhow::Result<Option<WorkerGuard>> {
    let (writer, guard) = match &options.file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(options.filter())
        .with_writer(writer)
        .with_ansi(options.file.is_none())
        .with_target(false);

    let installed = if options.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("Failed to install logger: {}", e))?;

    Ok(guard)
}
