//! Analysis sessions and their persistence

mod analysis;
mod storage;

pub use analysis::{AnalysisSession, EDIT_PERMISSION};
pub use storage::{stack_checksum, SCHEMA_VERSION};
