use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Options of one compilation run.
///
/// Keys use the camelCase spelling of the compiler plugin options so the
/// same block can be copied from a `nest-cli.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
    /// File name fragments routed to the property metadata path
    pub dto_file_name_suffix: Vec<String>,
    /// File name fragments routed to the operation metadata path
    pub controller_file_name_suffix: Vec<String>,
    /// Key under which operation descriptions are written
    pub controller_key_of_comment: String,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            dto_file_name_suffix: vec![".dto.ts".to_string(), ".entity.ts".to_string()],
            controller_file_name_suffix: vec![".controller.ts".to_string()],
            controller_key_of_comment: "description".to_string(),
        }
    }
}

/// Which synthesizer a file is handed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRoute {
    Model,
    Controller,
    Untouched,
}

impl PluginOptions {
    /// Routes a file by name. The model path is checked first, so a file
    /// matching both pattern lists is treated as a model file.
    pub fn route(&self, file_name: &str) -> FileRoute {
        if Self::matches(&self.dto_file_name_suffix, file_name) {
            FileRoute::Model
        } else if Self::matches(&self.controller_file_name_suffix, file_name) {
            FileRoute::Controller
        } else {
            FileRoute::Untouched
        }
    }

    fn matches(patterns: &[String], file_name: &str) -> bool {
        patterns.iter().any(|pattern| file_name.contains(pattern.as_str()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.controller_key_of_comment.trim().is_empty() {
            return Err(ConfigError::EmptyCommentKey);
        }
        // An empty fragment would match every file name
        if self.dto_file_name_suffix.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyPattern {
                field: "dtoFileNameSuffix",
            });
        }
        if self.controller_file_name_suffix.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyPattern {
                field: "controllerFileNameSuffix",
            });
        }
        Ok(())
    }
}
