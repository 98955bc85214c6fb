//! Staging-area construction.
//!
//! Materializes the package layout in a scratch directory: per-directory
//! zip bundles, copied single files and migrations, the folders list, SQL
//! placeholders, and the JSON manifests. The assembler consumes the result.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::domain::Config;
use crate::package::categorize::CategorizedFiles;
use crate::package::manifest::{placeholder_sql, write_json, PackageManifest, UpdaterManifest};
use crate::utils::{normalize_path, parent_dir};

/// A fully populated staging tree, ready for final assembly.
///
/// Created fresh by [`build`]; deleted by the assembler on success and
/// deliberately kept on a fatal assembly failure.
pub struct StagingArea {
    pub root: PathBuf,
}

/// Build the staging tree for one update package.
///
/// Staging recreation failures are fatal. A bundle that cannot be written
/// is skipped with a warning; a missing source file is skipped and removed
/// from `files.json`, so the manifest only ever references files that made
/// it into staging.
pub fn build(
    project_root: &Path,
    config: &Config,
    categorized: &CategorizedFiles,
    version: &str,
    previous: &str,
    rollback: bool,
) -> Result<StagingArea> {
    let staging = project_root.join(&config.staging_dir);
    if staging.exists() {
        fs::remove_dir_all(&staging)
            .with_context(|| format!("removing stale staging dir {}", staging.display()))?;
    }
    fs::create_dir_all(staging.join("update-files"))
        .with_context(|| format!("creating staging dir {}", staging.display()))?;

    // Per-directory bundles. Each bundle packs the directory's full
    // qualifying contents, not just the changed files.
    let mut archives: BTreeMap<String, String> = BTreeMap::new();
    for spec in &config.archive_dirs {
        let dir_path = project_root.join(&spec.dir);
        if !dir_path.is_dir() {
            continue;
        }
        let bundle_rel = format!("update-files/{}/{}", spec.dir, spec.archive);
        let bundle_path = staging.join(&bundle_rel);
        if let Some(parent) = bundle_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        match write_bundle(&dir_path, &spec.dir, &bundle_path, config) {
            Ok(added) => {
                tracing::debug!("Bundled {} files into {}", added, bundle_rel);
                archives.insert(bundle_rel, spec.dir.clone());
            }
            Err(err) => {
                tracing::warn!("Failed to create archive {}: {}", spec.archive, err);
                // A half-written bundle must not leak into the package.
                let _ = fs::remove_file(&bundle_path);
            }
        }
    }

    // Copy singles and migrations; drop manifest entries whose source
    // vanished between collection and staging.
    let mut files_manifest = categorized.singles.clone();
    let mut copy_plan: Vec<(String, String)> =
        categorized.singles.iter().map(|(dest, src)| (dest.clone(), src.clone())).collect();
    for migration in &categorized.migrations {
        copy_plan.push((format!("update-files/{}", migration), migration.clone()));
    }

    for (dest_rel, source_rel) in copy_plan {
        let source = project_root.join(&source_rel);
        if !source.is_file() {
            files_manifest.remove(&dest_rel);
            tracing::warn!("Skipping file: {} does not exist.", source_rel);
            continue;
        }
        let target = staging.join(&dest_rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::copy(&source, &target)
            .with_context(|| format!("copying {} to {}", source_rel, dest_rel))?;
        tracing::debug!("Copied file: {} to {}", source_rel, dest_rel);
    }

    // New-folder list over everything the package touches, root excluded.
    let folders: Vec<String> = categorized
        .all_paths()
        .filter_map(parent_dir)
        .map(|dir| format!("update-files/{}", dir))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    fs::write(staging.join("query.sql"), placeholder_sql(&categorized.migrations, false))
        .context("writing query.sql")?;
    fs::write(staging.join("rollback.sql"), placeholder_sql(&categorized.migrations, true))
        .context("writing rollback.sql")?;

    write_json(&staging.join("files.json"), &files_manifest)?;
    write_json(&staging.join("archives.json"), &archives)?;
    write_json(&staging.join("folders.json"), &folders)?;

    // A rollback package describes the downgrade: the version pair swaps.
    let (pkg_version, pkg_previous) =
        if rollback { (previous, version) } else { (version, previous) };
    write_json(&staging.join("package.json"), &PackageManifest::new(pkg_version))?;
    write_json(&staging.join("updater.json"), &UpdaterManifest::new(pkg_version, pkg_previous))?;

    Ok(StagingArea { root: staging })
}

/// Zip the qualifying contents of `dir_path` into `bundle_path`, entry
/// names relative to the directory root.
fn write_bundle(
    dir_path: &Path,
    dir_rel: &str,
    bundle_path: &Path,
    config: &Config,
) -> Result<usize> {
    let file = File::create(bundle_path)
        .with_context(|| format!("opening {}", bundle_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    let mut added = 0usize;

    for entry in WalkDir::new(dir_path).sort_by_file_name().into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = match entry.path().strip_prefix(dir_path) {
            Ok(rel) => normalize_path(&rel.to_string_lossy()),
            Err(_) => continue,
        };
        let full = format!("{}/{}", dir_rel, rel);
        if !config.extension_allowed(&full) {
            tracing::debug!("Skipping file: {} (invalid extension)", full);
            continue;
        }
        if config.is_excluded(&full) {
            tracing::debug!("Excluding file: {}", full);
            continue;
        }

        zip.start_file(rel.as_str(), options)?;
        let mut src = File::open(entry.path())
            .with_context(|| format!("reading {}", entry.path().display()))?;
        io::copy(&mut src, &mut zip)?;
        added += 1;
    }

    zip.finish()?;
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArchiveDirSpec;
    use crate::package::categorize::categorize;
    use std::collections::BTreeSet;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }

    fn config() -> Config {
        Config {
            archive_dirs: vec![ArchiveDirSpec {
                dir: "app/Models".to_string(),
                archive: "Models.zip".to_string(),
            }],
            single_files: vec!["routes/web.php".to_string(), "config/scribe.php".to_string()],
            file_extensions: vec![".php".to_string()],
            exclusions: vec![],
            staging_dir: "staging".to_string(),
            ..Config::default()
        }
    }

    fn changes(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn bundle_entries_are_directory_relative() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "app/Models/User.php", "<?php // user");
        write(tmp.path(), "app/Models/Post.php", "<?php // post");

        let cfg = config();
        let cat = categorize(&changes(&["app/Models/User.php"]), &cfg);
        let staging = build(tmp.path(), &cfg, &cat, "2.0.2", "2.0.1", false).expect("build");

        let bundle = staging.root.join("update-files/app/Models/Models.zip");
        let mut archive = ZipArchive::new(File::open(bundle).expect("open")).expect("zip");
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).expect("entry").name().to_string())
            .collect();
        assert_eq!(names, vec!["Post.php", "User.php"], "no app/Models/ prefix inside bundles");
    }

    #[test]
    fn missing_single_file_is_dropped_from_manifest() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "routes/web.php", "<?php");
        // config/scribe.php is configured but absent on disk.

        let cfg = config();
        let cat = categorize(&changes(&["routes/web.php", "config/scribe.php"]), &cfg);
        let staging = build(tmp.path(), &cfg, &cat, "2.0.2", "2.0.1", false).expect("build");

        let files: BTreeMap<String, String> = serde_json::from_str(
            &fs::read_to_string(staging.root.join("files.json")).expect("read"),
        )
        .expect("json");
        assert!(files.contains_key("update-files/routes/web.php"));
        assert!(!files.contains_key("update-files/config/scribe.php"));
        assert!(staging.root.join("update-files/routes/web.php").is_file());
    }

    #[test]
    fn manifests_are_byte_stable_across_runs() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "app/Models/User.php", "<?php");
        write(tmp.path(), "routes/web.php", "<?php");
        write(tmp.path(), "database/migrations/2024_01_01_000001_init.php", "<?php");

        let cfg = config();
        let cat = categorize(
            &changes(&[
                "app/Models/User.php",
                "routes/web.php",
                "database/migrations/2024_01_01_000001_init.php",
            ]),
            &cfg,
        );

        let first = build(tmp.path(), &cfg, &cat, "2.0.2", "2.0.1", false).expect("build");
        let read_all = |root: &Path| {
            ["files.json", "archives.json", "folders.json", "package.json", "updater.json"]
                .iter()
                .map(|name| fs::read_to_string(root.join(name)).expect("read"))
                .collect::<Vec<_>>()
        };
        let before = read_all(&first.root);

        let second = build(tmp.path(), &cfg, &cat, "2.0.2", "2.0.1", false).expect("rebuild");
        let after = read_all(&second.root);

        assert_eq!(before, after);
    }

    #[test]
    fn folders_list_covers_all_categories_and_skips_root() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "app/Models/User.php", "<?php");
        write(tmp.path(), "composer.json", "{}");
        write(tmp.path(), "database/migrations/2024_01_01_000001_init.php", "<?php");

        let mut cfg = config();
        cfg.file_extensions.clear(); // admit composer.json as a single

        let cat = categorize(
            &changes(&[
                "app/Models/User.php",
                "composer.json",
                "database/migrations/2024_01_01_000001_init.php",
            ]),
            &cfg,
        );
        let staging = build(tmp.path(), &cfg, &cat, "2.0.2", "2.0.1", false).expect("build");

        let folders: Vec<String> = serde_json::from_str(
            &fs::read_to_string(staging.root.join("folders.json")).expect("read"),
        )
        .expect("json");
        assert!(folders.contains(&"update-files/app/Models".to_string()));
        assert!(folders.contains(&"update-files/database/migrations".to_string()));
        assert!(!folders.iter().any(|f| f == "update-files/"), "root entries are excluded");
        let mut sorted = folders.clone();
        sorted.sort();
        assert_eq!(folders, sorted, "folders list is sorted");
    }

    #[test]
    fn rollback_swaps_the_version_pair() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "routes/web.php", "<?php");

        let cfg = config();
        let cat = categorize(&changes(&["routes/web.php"]), &cfg);
        let staging = build(tmp.path(), &cfg, &cat, "2.0.2", "2.0.1", true).expect("build");

        let updater: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(staging.root.join("updater.json")).expect("read"),
        )
        .expect("json");
        assert_eq!(updater["version"], "2.0.1");
        assert_eq!(updater["previous"], "2.0.2");
    }

    #[test]
    fn stale_staging_is_recreated() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "routes/web.php", "<?php");
        write(tmp.path(), "staging/leftover.txt", "old run");

        let cfg = config();
        let cat = categorize(&changes(&["routes/web.php"]), &cfg);
        let staging = build(tmp.path(), &cfg, &cat, "2.0.2", "2.0.1", false).expect("build");

        assert!(!staging.root.join("leftover.txt").exists());
    }
}
