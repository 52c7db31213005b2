use std::path::PathBuf;
use thiserror::Error;

/// Top-level error of the workspace
#[derive(Debug, Error)]
pub enum OcError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Plugin(#[from] PluginError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid plugin or project configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("controllerKeyOfComment cannot be empty")]
    EmptyCommentKey,
    #[error("{field} contains an empty file name pattern")]
    EmptyPattern { field: &'static str },
}

/// Failure to turn a file into a syntax tree
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {file}: {message}")]
    Syntax { file: String, message: String },
}

/// Host-level failure while transforming one file; aborts that file only
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("upstream transform failed for {file}: {reason}")]
    Upstream { file: String, reason: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Local failure while synthesizing metadata for a single declaration.
///
/// Never aborts the file: the declaration is left unmodified and the
/// error is turned into a diagnostic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("first argument of @{decorator}() is not an object literal")]
    NonObjectArgument { decorator: String },
    #[error("@{decorator} is not a call expression")]
    BareDecorator { decorator: String },
    #[error("declaration has no source position")]
    NoSourcePosition,
    #[error("position {offset} is outside of the file text ({len} bytes)")]
    PositionOutOfBounds { offset: usize, len: usize },
    #[error("{method}() does not return an object literal")]
    AccessorNotObject { method: String },
}
