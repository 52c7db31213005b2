pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod parsers;

pub use config::{FileRoute, PluginOptions};
pub use error::{ConfigError, OcError, ParseError, PluginError, SynthesisError};
pub use logging::{init, init_from_args};
