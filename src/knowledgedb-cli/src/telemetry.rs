//! Logging setup for the `kdb` binary
//!
//! - Human-readable events on stderr (stdout carries command output)
//! - Optional JSON formatted logs to rotating files
//! - Size-based rotation (10MB per file) plus daily rotation

use anyhow::Result;
use rolling_file::{RollingConditionBasic, RollingFileAppender};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Default filter for a verbosity level (`-v` count)
pub fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    format!(
        "warn,knowledgedb={level},knowledgedb_core={level},knowledgedb_cli={level}",
        level = level
    )
}

/// Initialize tracing. `RUST_LOG` wins over `verbosity`.
///
/// Returns a guard that must be kept alive to ensure file logs are flushed
pub fn init_telemetry(log_dir: Option<&Path>, verbosity: u8) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    // JSON file layer for structured logging
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;

            // Rotates when file reaches 10MB or daily, whichever comes first
            let file_appender = RollingFileAppender::new(
                dir.join("kdb.log"),
                RollingConditionBasic::new()
                    .daily()
                    .max_size(10 * 1024 * 1024), // 10 MB
                9, // Keep up to 10 files per day (0-9)
            )?;
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    if let Some(dir) = log_dir {
        tracing::debug!("File logging to {:?}", dir);
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert!(default_filter(0).contains("knowledgedb=warn"));
        assert!(default_filter(1).contains("knowledgedb_core=debug"));
        assert!(default_filter(5).contains("knowledgedb_cli=trace"));
    }
}
