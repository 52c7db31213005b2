use crate::ReportFormat;
use anyhow::{Context, Result};
use oc_core::PluginOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Contents of `oc-plugin.toml`
#[derive(Debug, Deserialize)]
pub struct Config {
    pub project_name: String,
    /// Directories or single files scanned for sources
    pub src_paths: Vec<String>,
    /// Compiler plugin options; defaults apply to missing keys
    #[serde(default)]
    pub plugin: PluginOptions,
    pub output: OutputConfig,
}

/// `[output]` section
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    pub path: String,
}

impl Config {
    /// Reads and validates `oc-plugin.toml`; relative paths are taken from
    /// `base_path`, or from the directory holding the file.
    pub fn load(path: &str, base_path: Option<&Path>) -> Result<Self> {
        let config_path = Path::new(path);
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        let base =
            base_path.unwrap_or_else(|| config_path.parent().unwrap_or_else(|| Path::new(".")));
        config.resolve_relative_paths(base)?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.project_name.is_empty() {
            anyhow::bail!("project_name cannot be empty");
        }

        if self.src_paths.is_empty() {
            anyhow::bail!("src_paths cannot be empty");
        }
        for (idx, src_path) in self.src_paths.iter().enumerate() {
            if !Path::new(src_path).exists() {
                anyhow::bail!("src_paths[{}] does not exist: {}", idx, src_path);
            }
        }

        self.plugin
            .validate()
            .context("Invalid [plugin] section")?;

        if ReportFormat::from_name(&self.output.format).is_none() {
            anyhow::bail!(
                "Invalid output format: {}. Supported formats: markdown, json",
                self.output.format
            );
        }
        if self.output.path.is_empty() {
            anyhow::bail!("output.path cannot be empty");
        }

        Ok(())
    }

    /// Format from the `[output]` section
    pub fn report_format(&self) -> Result<ReportFormat> {
        ReportFormat::from_name(&self.output.format)
            .ok_or_else(|| anyhow::anyhow!("Invalid output format: {}", self.output.format))
    }

    /// Resolves all relative paths in the config relative to the base path
    fn resolve_relative_paths(&mut self, base: &Path) -> Result<()> {
        let mut resolved_paths = Vec::new();
        for src_path in &self.src_paths {
            if Path::new(src_path).is_absolute() {
                resolved_paths.push(src_path.clone());
                continue;
            }
            let joined = base.join(src_path);
            let resolved = if joined.exists() {
                joined
                    .canonicalize()
                    .with_context(|| format!("Failed to resolve src_path: {}", src_path))?
            } else {
                joined
            };
            resolved_paths.push(resolved.to_string_lossy().to_string());
        }
        self.src_paths = resolved_paths;

        if !Path::new(&self.output.path).is_absolute() {
            let resolved = base.join(&self.output.path);
            self.output.path = resolved.to_string_lossy().to_string();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, body: &str) -> String {
        let path = dir.join("oc-plugin.toml");
        fs::write(&path, body).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_load_resolves_paths_and_plugin_options() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("src")).unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
project_name = "demo"
src_paths = ["src"]

[plugin]
controllerKeyOfComment = "summary"

[output]
format = "json"
path = "report.json"
"#,
        );

        let config = Config::load(&path, None).unwrap();
        assert!(Path::new(&config.src_paths[0]).is_absolute());
        assert!(config.output.path.ends_with("report.json"));
        assert_eq!(config.plugin.controller_key_of_comment, "summary");
        // Unset plugin keys keep their defaults
        assert_eq!(
            config.plugin.dto_file_name_suffix,
            PluginOptions::default().dto_file_name_suffix
        );
        assert_eq!(config.report_format().unwrap(), ReportFormat::Json);
    }

    #[test]
    fn test_missing_plugin_section_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("src")).unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
project_name = "demo"
src_paths = ["src"]

[output]
format = "markdown"
path = "r.md"
"#,
        );
        let config = Config::load(&path, None).unwrap();
        assert_eq!(config.plugin, PluginOptions::default());
    }

    #[test]
    fn test_validation_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("src")).unwrap();

        let output = |format: &str| format!("[output]\nformat = \"{}\"\npath = \"r\"\n", format);
        let cases = [
            (
                format!("project_name = \"\"\nsrc_paths = [\"src\"]\n{}", output("json")),
                "project_name",
            ),
            (
                format!("project_name = \"d\"\nsrc_paths = [\"missing\"]\n{}", output("json")),
                "does not exist",
            ),
            (
                format!("project_name = \"d\"\nsrc_paths = [\"src\"]\n{}", output("html")),
                "Invalid output format",
            ),
            (
                format!(
                    "project_name = \"d\"\nsrc_paths = [\"src\"]\n\
                     [plugin]\ncontrollerKeyOfComment = \"\"\n{}",
                    output("json")
                ),
                "[plugin]",
            ),
        ];
        for (body, expected) in cases {
            let path = write_config(temp_dir.path(), &body);
            let err = Config::load(&path, None).unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "expected `{}` in `{}`",
                expected,
                err
            );
        }
    }
}
