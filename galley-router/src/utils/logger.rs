//! Logging Infrastructure
//!
//! Structured `tracing` output to stdout, or to a daily rolling file when a
//! log directory is configured.

use std::path::Path;

use crate::core::DispatchConfig;

/// Initialize the logger at `info` on stdout
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger from `GALLEY_LOG_LEVEL` / `GALLEY_LOG_DIR`
pub fn init_logger_from(config: &DispatchConfig) {
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
}

/// Initialize the logger with optional file output
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&Path>) {
    let level = log_level.unwrap_or("info");

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir
        && dir.exists()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "galley-router");
        let _ = subscriber.with_writer(file_appender).try_init();
        return;
    }

    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_logger();
        init_logger_with_file(Some("debug"), None);
    }

    #[test]
    fn test_init_from_config_with_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DispatchConfig::with_overrides(3000, false);
        config.log_level = "warn".to_string();
        config.log_dir = Some(dir.path().to_path_buf());
        init_logger_from(&config);
    }
}
