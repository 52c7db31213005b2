use serde::{Deserialize, Serialize};

/// Description and example values read from the comment of one declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    /// Normalized comment text; `None` when nothing is left after normalization
    pub description: Option<String>,
    /// Values of `@example` tags in order of appearance
    pub examples: Vec<String>,
}

impl ExtractedMetadata {
    pub fn new(description: String, examples: Vec<String>) -> Self {
        Self {
            description: if description.is_empty() {
                None
            } else {
                Some(description)
            },
            examples,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.examples.is_empty()
    }
}
