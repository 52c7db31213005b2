pub mod location;
pub mod typescript;

pub use location::*;
pub use typescript::*;
