use indexmap::IndexMap;
use std::collections::HashMap;
use swc_ecma_ast::ObjectLit;

/// Synthesized option objects of one class, keyed by property name in
/// declaration order
pub type ClassMetadata = IndexMap<String, ObjectLit>;

/// Result of registering property metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Inserted,
    /// The property was already registered; its entry was replaced in place
    Replaced,
}

/// Metadata handed out when a class is flushed
#[derive(Debug)]
pub struct FlushedClass {
    pub metadata: ClassMetadata,
    /// Another file that flushed a class with the same name earlier
    pub collision: Option<String>,
}

/// Property metadata collected during a compilation run, keyed by class name.
///
/// Entries are consumed when their class is flushed, so a class declared
/// twice under the same name in one run does not inherit stale entries.
#[derive(Debug, Default)]
pub struct MetadataAccumulator {
    pending: IndexMap<String, ClassMetadata>,
    flushed_from: HashMap<String, String>,
}

impl MetadataAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class: &str, property: &str, metadata: ObjectLit) -> Registration {
        let entry = self.pending.entry(class.to_string()).or_default();
        match entry.insert(property.to_string(), metadata) {
            Some(_) => Registration::Replaced,
            None => Registration::Inserted,
        }
    }

    pub fn get(&self, class: &str) -> Option<&ClassMetadata> {
        self.pending.get(class)
    }

    /// Removes and returns the metadata of `class`, flushed from `file`
    pub fn take(&mut self, class: &str, file: &str) -> Option<FlushedClass> {
        let metadata = self.pending.shift_remove(class)?;
        let collision = match self.flushed_from.get(class) {
            Some(previous) if previous != file => Some(previous.clone()),
            Some(_) => None,
            None => {
                self.flushed_from.insert(class.to_string(), file.to_string());
                None
            }
        };
        Some(FlushedClass {
            metadata,
            collision,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Classes with metadata that has not been flushed yet
    pub fn pending_classes(&self) -> impl Iterator<Item = &str> {
        self.pending.keys().map(String::as_str)
    }
}
