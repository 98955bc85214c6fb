//! File categorization.
//!
//! Every path in the change set resolves to exactly one kind, first match
//! wins: migration, configured single file, archivable, filtered single.
//! Paths failing all four are dropped.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::Config;

pub const MIGRATIONS_PREFIX: &str = "database/migrations/";

/// Archive-relative key for a file copied into the staging tree.
fn update_files_key(path: &str) -> String {
    format!("update-files/{}", path)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Migration,
    /// Falls under a configured archive directory; carries the directory
    /// and bundle name of the matching entry.
    Archivable {
        dir: String,
        archive: String,
    },
    Single,
    Dropped,
}

/// Resolve the kind of one path against the configuration.
pub fn classify(path: &str, config: &Config) -> FileKind {
    if path.starts_with(MIGRATIONS_PREFIX) {
        return FileKind::Migration;
    }
    if config.single_files.iter().any(|s| s == path) {
        return FileKind::Single;
    }
    for spec in &config.archive_dirs {
        if path.starts_with(&format!("{}/", spec.dir)) {
            return FileKind::Archivable { dir: spec.dir.clone(), archive: spec.archive.clone() };
        }
    }
    if config.extension_allowed(path) && !config.is_excluded(path) {
        return FileKind::Single;
    }
    FileKind::Dropped
}

/// The three disjoint collections the package builder consumes.
#[derive(Debug, Default, Clone)]
pub struct CategorizedFiles {
    pub migrations: Vec<String>,
    /// Paths under archive directories, paired with the directory they
    /// fall under. The bundles themselves are rebuilt from the full
    /// directory contents at staging time.
    pub archivable: Vec<(String, String)>,
    /// Archive-relative key (`update-files/<path>`) to source path.
    pub singles: BTreeMap<String, String>,
}

impl CategorizedFiles {
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty() && self.archivable.is_empty() && self.singles.is_empty()
    }

    /// Union of all categorized source paths.
    pub fn all_paths(&self) -> impl Iterator<Item = &str> {
        self.migrations
            .iter()
            .map(String::as_str)
            .chain(self.archivable.iter().map(|(path, _)| path.as_str()))
            .chain(self.singles.values().map(String::as_str))
    }
}

/// Partition the change set per `classify`.
pub fn categorize(changes: &BTreeSet<String>, config: &Config) -> CategorizedFiles {
    let mut out = CategorizedFiles::default();

    for path in changes {
        match classify(path, config) {
            FileKind::Migration => out.migrations.push(path.clone()),
            FileKind::Single => {
                out.singles.insert(update_files_key(path), path.clone());
            }
            FileKind::Archivable { dir, .. } => out.archivable.push((path.clone(), dir)),
            FileKind::Dropped => {
                tracing::debug!("Dropping file: {} (filtered out)", path);
            }
        }
    }

    out
}
