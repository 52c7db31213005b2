use crate::commands::InspectRun;
use anyhow::Result;
use oc_core::models::{Change, FileReport, Severity};
use std::fs;
use std::path::Path;

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Generates the report in `.openapi_comments_report.md` format
    pub fn generate(&self, run: &InspectRun, output_path: &str) -> Result<()> {
        fs::write(Path::new(output_path), Self::render(run))?;
        Ok(())
    }

    pub fn render(run: &InspectRun) -> String {
        let mut report = String::new();

        report.push_str("# OpenAPI Comment Metadata Report\n\n");
        report.push_str(&format!("## Project\n{}\n\n", run.project_name));
        report.push_str(&format!(
            "## Inspection Date\n{}\n\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));

        let summary = run.summary();
        report.push_str("## Statistics\n\n");
        report.push_str(&format!("- **Files**: {}\n", summary.files));
        report.push_str(&format!("- **Changed Files**: {}\n", summary.changed_files));
        report.push_str(&format!("- **Changes**: {}\n", summary.changes));
        report.push_str(&format!("- **Warnings**: {}\n", summary.warnings));
        report.push_str(&format!("- **Failed Files**: {}\n\n", summary.failed_files));
        report.push_str("---\n\n");

        for file in run
            .reports
            .iter()
            .filter(|r| !r.is_unchanged() || !r.diagnostics.is_empty())
        {
            Self::render_file(&mut report, file);
        }

        if !run.failures.is_empty() {
            report.push_str("## Failed Files\n\n");
            for failure in &run.failures {
                report.push_str(&format!("- `{}`: {}\n", failure.file, failure.error));
            }
            report.push('\n');
        }

        report
    }

    fn render_file(report: &mut String, file: &FileReport) {
        report.push_str(&format!("### `{}`\n\n", file.file));

        if !file.changes.is_empty() {
            report.push_str("#### Changes\n\n");
            for change in &file.changes {
                report.push_str(&format!("- {}\n", Self::describe_change(change)));
            }
            report.push('\n');
        }

        if !file.diagnostics.is_empty() {
            report.push_str("#### Diagnostics\n\n");
            for diagnostic in &file.diagnostics {
                let marker = match diagnostic.severity {
                    Severity::Warning => "⚠️",
                    Severity::Info => "ℹ️",
                };
                let member = match (&diagnostic.class, &diagnostic.member) {
                    (Some(class), Some(member)) => format!(" `{}.{}`", class, member),
                    (Some(class), None) => format!(" `{}`", class),
                    (None, Some(member)) => format!(" `{}`", member),
                    (None, None) => String::new(),
                };
                report.push_str(&format!(
                    "- {} `{}`{}: {}\n",
                    marker, diagnostic.location, member, diagnostic.message
                ));
            }
            report.push('\n');
        }
    }

    fn describe_change(change: &Change) -> String {
        match change {
            Change::ImportInserted { alias } => format!("Inserted import `{}`", alias),
            Change::DecoratorMigrated {
                class,
                property,
                decorator,
            } => format!(
                "Moved `@{}` of `{}.{}` into the metadata accessor",
                decorator,
                class.as_deref().unwrap_or("?"),
                property
            ),
            Change::PropertyDocumented {
                class,
                property,
                description,
                examples,
            } => {
                let mut text = format!("Documented `{}.{}`", class, property);
                if let Some(description) = description {
                    text.push_str(&format!(": \"{}\"", description.replace('\n', " ")));
                }
                if !examples.is_empty() {
                    text.push_str(&format!(" (examples: {})", examples.join(", ")));
                }
                text
            }
            Change::AccessorGenerated { class, properties } => format!(
                "Generated accessor on `{}` for {}",
                class,
                properties.join(", ")
            ),
            Change::AccessorMerged {
                class,
                added,
                extended,
            } => format!(
                "Merged into accessor of `{}` (added: {}; extended: {})",
                class,
                if added.is_empty() { "-".to_string() } else { added.join(", ") },
                if extended.is_empty() { "-".to_string() } else { extended.join(", ") }
            ),
            Change::OperationDocumented {
                class,
                method,
                created,
                description,
            } => format!(
                "{} operation of `{}.{}`: \"{}\"",
                if *created { "Added" } else { "Extended" },
                class.as_deref().unwrap_or("?"),
                method,
                description.replace('\n', " ")
            ),
        }
    }
}
