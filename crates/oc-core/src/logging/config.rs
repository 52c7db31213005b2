use crate::logging::formatter::LogFormat;
use std::path::PathBuf;

/// Environment variable naming a log file
pub const LOG_FILE_ENV: &str = "OC_LOG_FILE";

const DEFAULT_LEVEL: &str = "info";

/// Resolved logging settings for one process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub file: Option<PathBuf>,
    pub console: bool,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Merges command line flags with the environment.
    ///
    /// `-v` wins over `--log-level`, which wins over `RUST_LOG`; an explicit
    /// `--log-file` wins over `OC_LOG_FILE`.
    pub fn resolve(
        log_level: Option<String>,
        log_file: Option<PathBuf>,
        format: LogFormat,
        verbose: bool,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let level = if verbose {
            "debug".to_string()
        } else {
            log_level
                .or_else(|| env("RUST_LOG"))
                .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
        };

        Self {
            level,
            file: log_file.or_else(|| env(LOG_FILE_ENV).map(PathBuf::from)),
            console: true,
            format,
        }
    }
}
