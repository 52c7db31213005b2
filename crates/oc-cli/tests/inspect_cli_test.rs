use std::fs;
use std::path::Path;

use anyhow::Result;

use oc_cli::commands::{collect_sources, execute_inspect};
use oc_cli::ReportFormat;

fn create_temp_project(files: &[(&str, &str)]) -> tempfile::TempDir {
    let tmp_dir = tempfile::tempdir().expect("failed to create temp dir");
    for (path, content) in files {
        let full_path = tmp_dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&full_path, content).expect("failed to write file");
    }
    tmp_dir
}

fn write_config(dir: &Path, format: &str) {
    let config = format!(
        r#"project_name = "demo"
src_paths = ["src"]

[output]
format = "{format}"
path = "report.{format}"
"#
    );
    fs::write(dir.join("oc-plugin.toml"), config).expect("failed to write config");
}

const USER_DTO: &str = r#"
export class UserDto {
  /** user id
   * @example 42 */
  id: number;
}
"#;

const USERS_CONTROLLER: &str = r#"
import openapi = require('@nestjs/swagger');

export class UsersController {
  /** Lists users */
  list() {}
}
"#;

#[test]
fn collect_sources_skips_declarations_and_node_modules() -> Result<()> {
    let project = create_temp_project(&[
        ("src/b.ts", ""),
        ("src/a/user.dto.ts", ""),
        ("src/types.d.ts", ""),
        ("src/node_modules/pkg/index.ts", ""),
        ("src/readme.md", ""),
    ]);
    let src = project.path().join("src").to_string_lossy().to_string();

    let files = collect_sources(&[src])?;
    let names: Vec<String> = files
        .iter()
        .map(|f| f.strip_prefix(project.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["src/a/user.dto.ts", "src/b.ts"]);
    Ok(())
}

#[test]
fn inspect_writes_json_report() -> Result<()> {
    let project = create_temp_project(&[
        ("src/user.dto.ts", USER_DTO),
        ("src/users.controller.ts", USERS_CONTROLLER),
        ("src/main.ts", "bootstrap();\n"),
    ]);
    write_config(project.path(), "json");

    let config_path = project.path().join("oc-plugin.toml");
    let summary = execute_inspect(config_path.to_str().unwrap(), None)?;
    assert_eq!(summary.files, 3);
    assert_eq!(summary.changed_files, 2);
    assert_eq!(summary.failed_files, 0);

    let content = fs::read_to_string(project.path().join("report.json"))?;
    let json: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(json["project"], "demo");
    assert_eq!(json["summary"]["changes_by_kind"]["accessor_generated"], 1);
    assert_eq!(json["summary"]["changes_by_kind"]["import_inserted"], 1);
    assert_eq!(json["summary"]["changes_by_kind"]["operation_documented"], 1);
    Ok(())
}

#[test]
fn inspect_reports_unparsable_files() -> Result<()> {
    let project = create_temp_project(&[
        ("src/user.dto.ts", USER_DTO),
        ("src/broken.dto.ts", "export class {"),
    ]);
    write_config(project.path(), "json");

    let config_path = project.path().join("oc-plugin.toml");
    let summary = execute_inspect(config_path.to_str().unwrap(), Some(ReportFormat::Markdown))?;
    assert_eq!(summary.failed_files, 1);
    assert_eq!(summary.changed_files, 1);

    // The format flag wins over the config file; the path stays as configured
    let content = fs::read_to_string(project.path().join("report.json"))?;
    assert!(content.contains("## Failed Files"));
    assert!(content.contains("broken.dto.ts"));
    Ok(())
}
