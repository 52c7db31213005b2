use anyhow::Result;
use std::fs;
use std::path::Path;

/// Creates the configuration file
pub fn execute_init(path: &str) -> Result<()> {
    let config_content = r#"project_name = "MyApp"

# Directories (or single files) scanned for .ts sources
src_paths = ["src"]

# Options handed to the compiler plugin (camelCase, as in nest-cli.json)
[plugin]
dtoFileNameSuffix = [".dto.ts", ".entity.ts"]
controllerFileNameSuffix = [".controller.ts"]
controllerKeyOfComment = "description"

[output]
format = "markdown"
path = ".openapi_comments_report.md"
"#;

    let config_path = Path::new(path);
    if config_path.exists() {
        anyhow::bail!("Config file already exists: {}", path);
    }

    fs::write(config_path, config_content)?;
    println!("Created config file: {}", path);

    Ok(())
}
