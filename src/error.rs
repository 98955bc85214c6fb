//! Error taxonomy shared across the packaging and export pipelines.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a command before any side effect is performed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("from and to dates are required")]
    MissingDates,

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    BadDate(String),

    #[error("invalid version format '{0}': use semantic versioning (e.g. 2.0.2)")]
    BadVersion(String),
}

/// A collaborator process or library call failed.
///
/// Callers log the failure and degrade to an empty result; the command
/// keeps running.
#[derive(Debug, Error)]
#[error("{tool} failed: {message}")]
pub struct ExternalToolError {
    pub tool: &'static str,
    pub message: String,
}

impl ExternalToolError {
    pub fn new(tool: &'static str, message: impl Into<String>) -> Self {
        Self { tool, message: message.into() }
    }
}

impl From<git2::Error> for ExternalToolError {
    fn from(err: git2::Error) -> Self {
        Self::new("git", err.message().to_string())
    }
}

/// An archive could not be created or written.
///
/// Per-directory bundles treat this as a warning and skip the directory;
/// the final output zip treats it as fatal and leaves staging in place.
#[derive(Debug, Error)]
#[error("cannot write archive {path}: {source}")]
pub struct ArchiveError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl ArchiveError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self { path: path.into(), source }
    }
}
