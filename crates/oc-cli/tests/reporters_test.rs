use std::fs;

use anyhow::Result;
use oc_cli::commands::{FileFailure, InspectRun};
use oc_cli::reporters::{JsonReporter, MarkdownReporter};
use oc_core::models::{Change, Diagnostic, FileReport, Location, Severity};
use oc_core::FileRoute;

fn dummy_location() -> Location {
    Location {
        file: "src/user.dto.ts".to_string(),
        line: 4,
        column: Some(3),
    }
}

fn build_dummy_run() -> InspectRun {
    let mut model = FileReport::new("src/user.dto.ts", FileRoute::Model);
    model.changes.push(Change::PropertyDocumented {
        class: "UserDto".to_string(),
        property: "id".to_string(),
        description: Some("user id".to_string()),
        examples: vec!["42".to_string()],
    });
    model.changes.push(Change::AccessorGenerated {
        class: "UserDto".to_string(),
        properties: vec!["id".to_string()],
    });
    model.diagnostics.push(Diagnostic {
        severity: Severity::Warning,
        location: dummy_location(),
        class: Some("UserDto".to_string()),
        member: Some("broken".to_string()),
        message: "first argument of @ApiProperty() is not an object literal".to_string(),
    });

    let mut controller = FileReport::new("src/users.controller.ts", FileRoute::Controller);
    controller.changes.push(Change::OperationDocumented {
        class: Some("UsersController".to_string()),
        method: "list".to_string(),
        created: true,
        description: "Lists users".to_string(),
    });

    InspectRun {
        project_name: "demo".to_string(),
        reports: vec![
            model,
            controller,
            FileReport::new("src/main.ts", FileRoute::Untouched),
        ],
        failures: vec![FileFailure {
            file: "src/broken.dto.ts".to_string(),
            error: "failed to parse src/broken.dto.ts: Eof".to_string(),
        }],
    }
}

#[test]
fn json_reporter_produces_summary_and_files() -> Result<()> {
    let tmp_dir = tempfile::tempdir()?;
    let output_path = tmp_dir.path().join("report.json");

    JsonReporter.generate(&build_dummy_run(), output_path.to_str().unwrap())?;

    let content = fs::read_to_string(&output_path)?;
    let json: serde_json::Value = serde_json::from_str(&content)?;

    let summary = &json["summary"];
    assert_eq!(summary["total_files"], 4);
    assert_eq!(summary["changed_files"], 2);
    assert_eq!(summary["changes"], 3);
    assert_eq!(summary["warnings"], 1);
    assert_eq!(summary["failed_files"], 1);
    assert_eq!(summary["files_by_route"]["model"], 1);
    assert_eq!(summary["changes_by_kind"]["operation_documented"], 1);

    assert_eq!(json["files"][0]["changes"][0]["kind"], "property_documented");
    assert_eq!(json["files"][0]["route"], "model");
    assert_eq!(json["failures"][0]["file"], "src/broken.dto.ts");
    Ok(())
}

#[test]
fn markdown_reporter_lists_changes_and_diagnostics() -> Result<()> {
    let tmp_dir = tempfile::tempdir()?;
    let output_path = tmp_dir.path().join("report.md");

    MarkdownReporter.generate(&build_dummy_run(), output_path.to_str().unwrap())?;
    let content = fs::read_to_string(&output_path)?;

    assert!(content.contains("## Statistics"));
    assert!(content.contains("- **Changed Files**: 2"));
    assert!(content.contains("Documented `UserDto.id`: \"user id\" (examples: 42)"));
    assert!(content.contains("Added operation of `UsersController.list`"));
    assert!(content.contains("`src/user.dto.ts:4:3` `UserDto.broken`"));
    assert!(content.contains("## Failed Files"));
    // Untouched files without diagnostics are not listed
    assert!(!content.contains("### `src/main.ts`"));
    Ok(())
}
