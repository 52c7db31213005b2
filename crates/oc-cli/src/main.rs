use anyhow::Result;
use clap::{Parser, Subcommand};
use oc_cli::commands::{execute_init, execute_inspect};
use oc_cli::ReportFormat;
use oc_core::logging::formatter::LogFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oc-plugin")]
#[command(version, about = "Synthesizes OpenAPI metadata from doc comments of NestJS sources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also write logs to this file; overrides OC_LOG_FILE
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log format: text or json
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// Shortcut for --log-level debug
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration file
    Init {
        #[arg(long, default_value = "oc-plugin.toml")]
        path: String,
    },
    /// Run the plugin over the project sources and write a report
    Inspect {
        #[arg(short, long, default_value = "oc-plugin.toml")]
        config: String,

        /// Report format; defaults to output.format of the config file
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.parse().map_err(anyhow::Error::msg)?;
    oc_core::init_from_args(cli.log_level, cli.log_file, log_format, cli.verbose)?;

    match cli.command {
        Commands::Init { path } => execute_init(&path),
        Commands::Inspect { config, format } => {
            let summary = execute_inspect(&config, format)?;
            if summary.failed_files > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
