use crate::commands::InspectRun;
use anyhow::Result;
use oc_core::models::Change;
use oc_core::FileRoute;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Generates a JSON report
    pub fn generate(&self, run: &InspectRun, output_path: &str) -> Result<()> {
        let summary = Self::build_summary(run);

        let report = serde_json::json!({
            "version": "1.0.0",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "project": run.project_name,
            "summary": summary,
            "files": run.reports,
            "failures": run.failures,
        });

        let json_string = serde_json::to_string_pretty(&report)?;
        fs::write(Path::new(output_path), json_string)?;
        Ok(())
    }

    fn build_summary(run: &InspectRun) -> serde_json::Value {
        let summary = run.summary();

        let mut files_by_route: BTreeMap<&str, usize> = BTreeMap::new();
        for report in &run.reports {
            let key = match report.route {
                FileRoute::Model => "model",
                FileRoute::Controller => "controller",
                FileRoute::Untouched => "untouched",
            };
            *files_by_route.entry(key).or_insert(0) += 1;
        }

        let mut changes_by_kind: BTreeMap<&str, usize> = BTreeMap::new();
        for change in run.reports.iter().flat_map(|r| &r.changes) {
            *changes_by_kind.entry(change_kind(change)).or_insert(0) += 1;
        }

        serde_json::json!({
            "total_files": summary.files,
            "changed_files": summary.changed_files,
            "changes": summary.changes,
            "warnings": summary.warnings,
            "failed_files": summary.failed_files,
            "files_by_route": files_by_route,
            "changes_by_kind": changes_by_kind,
        })
    }
}

/// Serialized tag of a change
pub(crate) fn change_kind(change: &Change) -> &'static str {
    match change {
        Change::ImportInserted { .. } => "import_inserted",
        Change::DecoratorMigrated { .. } => "decorator_migrated",
        Change::PropertyDocumented { .. } => "property_documented",
        Change::AccessorGenerated { .. } => "accessor_generated",
        Change::AccessorMerged { .. } => "accessor_merged",
        Change::OperationDocumented { .. } => "operation_documented",
    }
}
