pub mod location;
pub mod metadata;
pub mod report;

pub use location::*;
pub use metadata::*;
pub use report::*;
