//! Compile-time synthesis of OpenAPI metadata from doc comments.
//!
//! Model files (DTOs, entities) get a static `_OPENAPI_METADATA_FACTORY`
//! accessor carrying property descriptions and examples; controller files
//! get `@ApiOperation({ description })` on documented handlers.

mod accumulator;
mod comments;
mod constants;
mod controller_class;
mod decorators;
mod literals;
mod model_class;
mod namespace;
mod plugin;
mod walker;

pub use accumulator::*;
pub use comments::*;
pub use constants::*;
pub use controller_class::*;
pub use decorators::*;
pub use literals::*;
pub use model_class::*;
pub use namespace::*;
pub use plugin::*;
pub use walker::*;
