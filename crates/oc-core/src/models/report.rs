use crate::config::FileRoute;
use crate::models::Location;
use serde::{Deserialize, Serialize};

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

/// Something the host may want to log about one declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    /// Host class, when known
    pub class: Option<String>,
    /// Property or method name, when known
    pub member: Option<String>,
    pub message: String,
}

/// One edit applied to a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// Import of the OpenAPI package prepended to the file
    ImportInserted { alias: String },
    /// Property metadata decorator removed; its arguments moved to the accessor
    DecoratorMigrated {
        class: Option<String>,
        property: String,
        decorator: String,
    },
    /// Metadata registered for a property
    PropertyDocumented {
        class: String,
        property: String,
        /// Description taken from the comment, if it was added
        description: Option<String>,
        /// Examples taken from the comment, if they were added
        examples: Vec<String>,
    },
    /// New static accessor appended to a class
    AccessorGenerated {
        class: String,
        properties: Vec<String>,
    },
    /// Existing static accessor extended
    AccessorMerged {
        class: String,
        /// Properties added with their full metadata
        added: Vec<String>,
        /// Existing properties that received new sub-keys
        extended: Vec<String>,
    },
    /// Operation decorator created or extended with a description
    OperationDocumented {
        class: Option<String>,
        method: String,
        created: bool,
        description: String,
    },
}

/// Outcome of transforming one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub route: FileRoute,
    pub changes: Vec<Change>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn new(file: &str, route: FileRoute) -> Self {
        Self {
            file: file.to_string(),
            route,
            changes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}
