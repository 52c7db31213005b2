pub mod init;
pub mod inspect;

pub use init::execute_init;
pub use inspect::{
    collect_sources, execute_inspect, inspect_files, FileFailure, InspectRun, InspectSummary,
};
