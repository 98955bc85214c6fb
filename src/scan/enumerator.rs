//! Enumeration of configured archive directories and single files.
//!
//! Complements the git change set: everything under an archive directory
//! (extension and exclusion filters applied) plus each configured single
//! file that exists on disk.

use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

use crate::domain::Config;
use crate::utils::normalize_path;

/// Collect all packageable paths named by the configuration.
///
/// Missing directories are silently skipped; missing single files are
/// logged at debug level and dropped. The result is deduplicated and
/// slash-normalized.
pub fn enumerate_config_files(root: &Path, config: &Config) -> BTreeSet<String> {
    let mut files = BTreeSet::new();

    for spec in &config.archive_dirs {
        let dir_path = root.join(&spec.dir);
        if !dir_path.is_dir() {
            continue;
        }

        for entry in
            WalkDir::new(&dir_path).sort_by_file_name().into_iter().filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = match entry.path().strip_prefix(&dir_path) {
                Ok(rel) => normalize_path(&rel.to_string_lossy()),
                Err(_) => continue,
            };
            let full = format!("{}/{}", spec.dir, rel);
            if !config.extension_allowed(&full) {
                tracing::debug!("Skipping file: {} (invalid extension)", full);
                continue;
            }
            if config.is_excluded(&full) {
                tracing::debug!("Excluding file: {}", full);
                continue;
            }
            files.insert(full);
        }
    }

    for single in &config.single_files {
        let single = normalize_path(single);
        if root.join(&single).is_file() && !config.is_excluded(&single) {
            files.insert(single);
        } else {
            tracing::debug!("Skipping single file: {} (does not exist or excluded)", single);
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArchiveDirSpec;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }

    fn config_with_models_dir() -> Config {
        Config {
            archive_dirs: vec![ArchiveDirSpec {
                dir: "app/Models".to_string(),
                archive: "Models.zip".to_string(),
            }],
            single_files: vec!["routes/web.php".to_string(), "config/scribe.php".to_string()],
            file_extensions: vec![".php".to_string()],
            exclusions: vec!["app/Models/Legacy/".to_string()],
            ..Config::default()
        }
    }

    #[test]
    fn walks_archive_dirs_with_filters() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "app/Models/User.php", "<?php");
        write(tmp.path(), "app/Models/Concerns/HasRoles.php", "<?php");
        write(tmp.path(), "app/Models/notes.md", "not php");
        write(tmp.path(), "app/Models/Legacy/Old.php", "<?php");
        write(tmp.path(), "routes/web.php", "<?php");

        let files = enumerate_config_files(tmp.path(), &config_with_models_dir());

        assert!(files.contains("app/Models/User.php"));
        assert!(files.contains("app/Models/Concerns/HasRoles.php"));
        assert!(files.contains("routes/web.php"));
        assert!(!files.contains("app/Models/notes.md"), "extension filter must apply");
        assert!(!files.contains("app/Models/Legacy/Old.php"), "exclusions must apply");
    }

    #[test]
    fn missing_directories_and_files_are_skipped() {
        let tmp = TempDir::new().expect("tmp");
        // Neither app/Models nor the single files exist.
        let files = enumerate_config_files(tmp.path(), &config_with_models_dir());
        assert!(files.is_empty());
    }

    #[test]
    fn empty_extension_filter_admits_everything() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "app/Models/data.csv", "a,b");

        let mut config = config_with_models_dir();
        config.file_extensions.clear();

        let files = enumerate_config_files(tmp.path(), &config);
        assert!(files.contains("app/Models/data.csv"));
    }
}
