//! Update-package pipeline: categorize, stage, assemble.

pub mod assemble;
pub mod categorize;
pub mod manifest;
pub mod stage;

pub use assemble::assemble;
pub use categorize::{categorize, CategorizedFiles, FileKind, MIGRATIONS_PREFIX};
pub use stage::{build, StagingArea};
