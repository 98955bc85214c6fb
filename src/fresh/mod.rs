//! Fresh-install export: table truncation, SQL dump, `.env` sanitization.

pub mod db;
pub mod dump;
pub mod env;

pub use db::{truncate_tables, MysqlRunner, SqlRunner};
pub use dump::export_database;
pub use env::{reset_env_file, sanitize_env};

use std::fs;
use std::path::Path;

use crate::domain::InstallView;

/// Stage the install view by copying `source` to `target`.
///
/// A no-op when the two paths are equal; a warning when the source is
/// absent. Never fatal.
pub fn stage_install_view(root: &Path, view: &InstallView) {
    if view.source == view.target {
        tracing::debug!("Install view source equals target, nothing to copy");
        return;
    }
    let source = root.join(&view.source);
    if !source.is_file() {
        tracing::warn!("Source file {} does not exist, skipping.", view.source);
        return;
    }
    let target = root.join(&view.target);
    if let Some(parent) = target.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            tracing::warn!("Could not create {}: {}", parent.display(), err);
            return;
        }
    }
    match fs::copy(&source, &target) {
        Ok(_) => tracing::info!("Copied {} to {}", view.source, view.target),
        Err(err) => tracing::warn!("Could not copy {}: {}", view.source, err),
    }
}
