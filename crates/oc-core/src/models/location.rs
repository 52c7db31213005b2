use serde::{Deserialize, Serialize};
use std::fmt;

/// Location in code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Location {
    /// File path
    pub file: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (optional, 1-based)
    pub column: Option<usize>,
}

impl Location {
    /// Location that only names a file
    pub fn file_only(file: &str) -> Self {
        Self {
            file: file.to_string(),
            line: 0,
            column: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (0, _) => write!(f, "{}", self.file),
            (line, Some(column)) => write!(f, "{}:{}:{}", self.file, line, column),
            (line, None) => write!(f, "{}:{}", self.file, line),
        }
    }
}
