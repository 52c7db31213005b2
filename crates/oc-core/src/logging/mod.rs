pub mod config;
pub mod file_writer;
pub mod formatter;

use anyhow::Result;
use config::LoggingConfig;
use formatter::LogFormat;
use std::path::PathBuf;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Initialize logging system with the given configuration
pub fn init(config: LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.console {
        layers.push(console_layer(config.format));
    }
    if let Some(log_file) = &config.file {
        layers.push(file_layer(file_writer::LogFile::open(log_file)?, config.format));
    }

    Registry::default()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn console_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(true)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    }
}

fn file_layer(file_writer: file_writer::LogFile, format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Text => fmt::layer()
            .with_writer(file_writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(false)
            .with_timer(fmt::time::ChronoUtc::rfc_3339())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(file_writer)
            .with_target(true)
            .with_timer(fmt::time::ChronoUtc::rfc_3339())
            .boxed(),
    }
}

/// Initialize logging from environment variables and CLI arguments
pub fn init_from_args(
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    log_format: LogFormat,
    verbose: bool,
) -> Result<()> {
    init(LoggingConfig::resolve(
        log_level,
        log_file,
        log_format,
        verbose,
        |key| std::env::var(key).ok(),
    ))
}
