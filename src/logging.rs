//! File logging for the terminal binary.
//!
//! The terminal belongs to the dialogs while they are open, so log output
//! goes to a file or nowhere.

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Log file name inside the configured directory.
pub const LOG_FILE_NAME: &str = "tui-dialogs.log";

/// Build the filter: `RUST_LOG` wins over the configured directive.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter))
}

/// Install the global subscriber.
///
/// Returns `None` when no log directory is configured. The returned guard
/// must stay alive for as long as logs should be flushed.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let Some(directory) = &config.directory else {
        return Ok(None);
    };

    std::fs::create_dir_all(directory)
        .with_context(|| format!("creating log directory {}", directory.display()))?;

    let file_appender = tracing_appender::rolling::never(directory, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .context("installing log subscriber")?;

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_without_directory_is_noop() {
        let config = LoggingConfig::default();
        let guard = init(&config).unwrap();
        assert!(guard.is_none());
    }
}
