//! Core configuration types.
//!
//! `Config` is loaded once per invocation and passed by reference into
//! every pipeline stage; nothing reads ambient state after startup.

use serde::{Deserialize, Serialize};

/// A source directory whose qualifying contents are bundled into one named
/// zip inside the update package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveDirSpec {
    /// Repository-relative directory, forward slashes, no trailing slash.
    pub dir: String,
    /// File name of the bundle, e.g. `Models.zip`.
    pub archive: String,
}

/// Version defaults used when the command line does not supply them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioning {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub previous_version: Option<String>,
}

/// Connection parameters for the fresh-install export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            username: "root".to_string(),
            password: String::new(),
            database: "laravel".to_string(),
        }
    }
}

/// Optional install-view staging step for `make-fresh`: copy `source` to
/// `target` before exporting. A no-op when the two paths are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallView {
    pub source: String,
    pub target: String,
}

/// Immutable per-invocation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories archived as per-directory zip bundles, in order.
    /// Order matters: categorization takes the first matching entry.
    pub archive_dirs: Vec<ArchiveDirSpec>,

    /// Files copied into the package at their own path.
    pub single_files: Vec<String>,

    /// Suffixes a file must carry to be packaged (empty = no filter).
    pub file_extensions: Vec<String>,

    /// Exclusion patterns: `dir/` prefixes, globs, or exact paths.
    pub exclusions: Vec<String>,

    /// Tables truncated by `make-fresh`.
    pub truncate_tables: Vec<String>,

    pub versioning: Versioning,

    /// Staging tree for the package builder, relative to the project root.
    pub staging_dir: String,

    pub database: DatabaseSettings,

    pub install_view: Option<InstallView>,
}

impl Config {
    /// A path qualifies when the extension filter is empty or one of the
    /// configured suffixes matches.
    pub fn extension_allowed(&self, path: &str) -> bool {
        self.file_extensions.is_empty()
            || self.file_extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }

    /// Exclusion patterns are matched case-sensitively.
    pub fn is_excluded(&self, path: &str) -> bool {
        crate::utils::matches_any(path, &self.exclusions, true)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_dirs: default_archive_dirs(),
            single_files: default_single_files(),
            file_extensions: vec![".php".to_string()],
            exclusions: default_exclusions(),
            truncate_tables: Vec::new(),
            versioning: Versioning::default(),
            staging_dir: "storage/app/update-temp".to_string(),
            database: DatabaseSettings::default(),
            install_view: None,
        }
    }
}

fn default_archive_dirs() -> Vec<ArchiveDirSpec> {
    [
        ("app/Http/Controllers", "Controllers.zip"),
        ("app/Http/Middleware", "Middleware.zip"),
        ("app/Models", "Models.zip"),
        ("app/Console", "Console.zip"),
        ("app/Imports", "Imports.zip"),
        ("resources/views", "views.zip"),
        ("public/assets", "assets.zip"),
    ]
    .iter()
    .map(|(dir, archive)| ArchiveDirSpec { dir: dir.to_string(), archive: archive.to_string() })
    .collect()
}

fn default_single_files() -> Vec<String> {
    [
        "app/Http/Kernel.php",
        "app/Providers/AppServiceProvider.php",
        "app/app_helpers.php",
        "app/Exceptions/Handler.php",
        "routes/api.php",
        "routes/web.php",
        "config/scribe.php",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exclusions() -> Vec<String> {
    [".env", "storage/", "vendor/", "node_modules/", ".git/", "bootstrap/cache/"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_carries_laravel_layout() {
        let cfg = Config::default();
        assert!(cfg.archive_dirs.iter().any(|a| a.dir == "app/Models" && a.archive == "Models.zip"));
        assert!(cfg.single_files.contains(&"routes/web.php".to_string()));
        assert!(cfg.exclusions.contains(&"vendor/".to_string()));
        assert_eq!(cfg.file_extensions, vec![".php".to_string()]);
        assert_eq!(cfg.staging_dir, "storage/app/update-temp");
    }

    #[test]
    fn database_defaults_are_generic_placeholders() {
        let db = DatabaseSettings::default();
        assert_eq!(db.host, "127.0.0.1");
        assert_eq!(db.port, 3306);
        assert_eq!(db.database, "laravel");
        assert!(db.password.is_empty());
    }
}
