//! Manifest artifacts written at the staging root.
//!
//! Key order must stay byte-stable across identical runs: maps are
//! `BTreeMap`s, structs serialize in declaration order, and everything is
//! pretty-printed the same way.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Metadata files placed at the root of the final zip, in order.
pub const METADATA_FILES: [&str; 7] = [
    "package.json",
    "updater.json",
    "files.json",
    "archives.json",
    "folders.json",
    "query.sql",
    "rollback.sql",
];

#[derive(Debug, Serialize)]
pub struct PackageManifest {
    pub version: String,
    pub files: &'static str,
    pub archives: &'static str,
    pub folders: &'static str,
    pub manual_queries: bool,
    pub query_path: &'static str,
}

impl PackageManifest {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            files: "files.json",
            archives: "archives.json",
            folders: "folders.json",
            manual_queries: true,
            query_path: "query.sql",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdaterManifest {
    pub version: String,
    pub previous: String,
    pub manual_queries: bool,
    pub query_path: &'static str,
}

impl UpdaterManifest {
    pub fn new(version: &str, previous: &str) -> Self {
        Self {
            version: version.to_string(),
            previous: previous.to_string(),
            manual_queries: true,
            query_path: "query.sql",
        }
    }
}

/// Pretty-print `value` to `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {}", path.display()))?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))
}

/// Placeholder migration SQL. Extracting real statements from migration
/// sources is out of scope; each migration gets a labeled comment block.
pub fn placeholder_sql(migrations: &[String], rollback: bool) -> String {
    if migrations.is_empty() {
        return if rollback {
            "-- Add rollback queries here".to_string()
        } else {
            "-- Add manual queries here".to_string()
        };
    }

    let mut sql = String::new();
    for file in migrations {
        if rollback {
            sql.push_str(&format!("-- Rollback for: {}\n", file));
            sql.push_str("-- Add rollback SQL here\n");
        } else {
            sql.push_str(&format!("-- Migration: {}\n", file));
            sql.push_str("-- Add migration SQL here\n");
        }
    }
    sql
}
