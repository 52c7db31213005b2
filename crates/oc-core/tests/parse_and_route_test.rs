use oc_core::models::{Change, FileReport};
use oc_core::parsers::{CommentStyle, TypeScriptParser};
use oc_core::{FileRoute, PluginOptions};
use tempfile::TempDir;

#[test]
fn test_project_files_are_parsed_and_routed() {
    let temp_dir = TempDir::new().unwrap();
    let files = [
        (
            "create-user.dto.ts",
            "export class CreateUserDto {\n  /** name */\n  name: string;\n}\n",
        ),
        (
            "users.controller.ts",
            "export class UsersController {\n  /** lists users */\n  list() {}\n}\n",
        ),
        ("users.service.ts", "export class UsersService {}\n"),
    ];
    for (name, source) in files {
        std::fs::write(temp_dir.path().join(name), source).unwrap();
    }

    let options = PluginOptions::default();
    let parser = TypeScriptParser::new();
    let mut routes = Vec::new();
    for (name, _) in files {
        let file = parser.parse_file(&temp_dir.path().join(name)).unwrap();
        routes.push(options.route(file.name()));

        for comment in file.source.comments() {
            let text = file.source.comment_text(comment);
            match comment.style {
                CommentStyle::Block => assert!(text.starts_with("/*")),
                CommentStyle::Line => assert!(text.starts_with("//")),
            }
        }
    }

    assert_eq!(
        routes,
        vec![FileRoute::Model, FileRoute::Controller, FileRoute::Untouched]
    );
}

#[test]
fn test_options_from_nest_cli_json_block() {
    let options: PluginOptions = serde_json::from_str(
        r#"{ "dtoFileNameSuffix": [".model.ts"], "controllerKeyOfComment": "summary" }"#,
    )
    .unwrap();

    assert_eq!(options.route("src/user.model.ts"), FileRoute::Model);
    assert_eq!(options.route("src/user.dto.ts"), FileRoute::Untouched);
    assert_eq!(options.route("src/users.controller.ts"), FileRoute::Controller);
    assert!(options.validate().is_ok());
}

#[test]
fn test_file_report_serializes_changes_with_kind_tag() {
    let mut report = FileReport::new("a.dto.ts", FileRoute::Model);
    report.changes.push(Change::ImportInserted {
        alias: "pre_openapi".to_string(),
    });

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["route"], "model");
    assert_eq!(json["changes"][0]["kind"], "import_inserted");
    assert_eq!(json["changes"][0]["alias"], "pre_openapi");
}
