use crate::config::Config;
use crate::reporters::{JsonReporter, MarkdownReporter};
use crate::ReportFormat;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use oc_core::models::{FileReport, Severity};
use oc_core::parsers::TypeScriptParser;
use oc_swagger::before;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A file that could not be parsed or transformed
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

/// Everything one compilation run produced
#[derive(Debug, Serialize)]
pub struct InspectRun {
    pub project_name: String,
    pub reports: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
}

/// Counts printed after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InspectSummary {
    pub files: usize,
    pub changed_files: usize,
    pub changes: usize,
    pub warnings: usize,
    pub failed_files: usize,
}

impl InspectRun {
    pub fn summary(&self) -> InspectSummary {
        InspectSummary {
            files: self.reports.len() + self.failures.len(),
            changed_files: self.reports.iter().filter(|r| !r.is_unchanged()).count(),
            changes: self.reports.iter().map(|r| r.changes.len()).sum(),
            warnings: self.reports.iter().map(|r| r.warnings().count()).sum(),
            failed_files: self.failures.len(),
        }
    }
}

/// Runs the plugin over the project as a dry run and writes a report
pub fn execute_inspect(config_path: &str, format: Option<ReportFormat>) -> Result<InspectSummary> {
    let config_file_path = Path::new(config_path);
    let config = Config::load(config_path, config_file_path.parent())?;
    let format = match format {
        Some(format) => format,
        None => config.report_format()?,
    };

    let files = collect_sources(&config.src_paths)?;
    info!(files = files.len(), project = %config.project_name, "Collected sources");

    let run = inspect_files(&config, &files)?;

    let pb = ProgressBar::new_spinner();
    pb.set_message("Generating report...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    match format {
        ReportFormat::Json => JsonReporter.generate(&run, &config.output.path)?,
        ReportFormat::Markdown => MarkdownReporter.generate(&run, &config.output.path)?,
    }
    pb.finish_with_message("Report generated");

    let summary = run.summary();
    print_summary(&run, &summary, &config.output.path);
    Ok(summary)
}

/// Transforms `files` in order within one compilation run
pub fn inspect_files(config: &Config, files: &[PathBuf]) -> Result<InspectRun> {
    let mut plugin = before(config.plugin.clone()).context("Invalid plugin options")?;
    let parser = TypeScriptParser::new();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}",
            )
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );
    pb.set_message("Transforming...");

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for path in files {
        let transformed = parser
            .parse_file(path)
            .map_err(oc_core::OcError::from)
            .and_then(|file| plugin.transform(file).map_err(oc_core::OcError::from));
        match transformed {
            Ok(transformed) => reports.push(transformed.report),
            Err(err) => {
                warn!(file = %path.display(), error = %err, "File skipped");
                failures.push(FileFailure {
                    file: path.to_string_lossy().to_string(),
                    error: err.to_string(),
                });
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Files transformed");

    let pending: Vec<&str> = plugin.accumulator().pending_classes().collect();
    if !pending.is_empty() {
        warn!(classes = ?pending, "Metadata collected for classes that were never flushed");
    }

    Ok(InspectRun {
        project_name: config.project_name.clone(),
        reports,
        failures,
    })
}

/// Collects `.ts` sources below `src_paths`, sorted, skipping
/// `node_modules` and declaration files
pub fn collect_sources(src_paths: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for src_path in src_paths {
        find_ts_files(Path::new(src_path), &mut files)
            .with_context(|| format!("Failed to scan {}", src_path))?;
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn find_ts_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if path.is_file() {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.ends_with(".ts") && !name.ends_with(".d.ts") {
            files.push(path.to_path_buf());
        }
        return Ok(());
    }

    if path.is_dir() {
        if path.file_name().is_some_and(|name| name == "node_modules") {
            return Ok(());
        }
        for entry in std::fs::read_dir(path)? {
            let path = entry?.path();
            find_ts_files(&path, files)?;
        }
    }

    Ok(())
}

fn print_summary(run: &InspectRun, summary: &InspectSummary, output_path: &str) {
    println!(
        "{} {} files, {} changed, {} changes",
        "Inspection completed:".bold(),
        summary.files,
        summary.changed_files.to_string().green(),
        summary.changes
    );
    if summary.warnings > 0 {
        println!("{} {}", "Warnings:".yellow().bold(), summary.warnings);
        for diagnostic in run
            .reports
            .iter()
            .flat_map(|r| &r.diagnostics)
            .filter(|d| d.severity == Severity::Warning)
        {
            println!("  {} {}", diagnostic.location.to_string().dimmed(), diagnostic.message);
        }
    }
    if summary.failed_files > 0 {
        println!("{} {}", "Failed files:".red().bold(), summary.failed_files);
        for failure in &run.failures {
            println!("  {} {}", failure.file.red(), failure.error);
        }
    }
    println!("Report saved to {}", output_path);
}
