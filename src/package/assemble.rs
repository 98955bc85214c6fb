//! Final artifact assembly.
//!
//! Mirrors the staging tree into the output zip: metadata files at the
//! archive root, everything else under `update-files/`, empty directories
//! preserved. Staging is deleted only after the zip is fully written, so a
//! failed assembly leaves the tree behind for inspection.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::ArchiveError;
use crate::package::manifest::METADATA_FILES;
use crate::package::stage::StagingArea;
use crate::utils::normalize_path;

/// Zip `staging` into `output` and delete the staging tree on success.
pub fn assemble(staging: &StagingArea, output: &Path) -> Result<(), ArchiveError> {
    let file = File::create(output).map_err(|err| ArchiveError::new(output, err))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for name in METADATA_FILES {
        let path = staging.root.join(name);
        if !path.is_file() {
            continue;
        }
        zip.start_file(name, options).map_err(|err| zip_error(output, err))?;
        copy_into(&path, &mut zip).map_err(|err| ArchiveError::new(output, err))?;
        tracing::debug!("Added metadata file to zip root: {}", name);
    }

    let update_files = staging.root.join("update-files");
    if update_files.is_dir() {
        for entry in
            WalkDir::new(&update_files).min_depth(1).sort_by_file_name().into_iter().flatten()
        {
            let rel = match entry.path().strip_prefix(&update_files) {
                Ok(rel) => normalize_path(&rel.to_string_lossy()),
                Err(_) => continue,
            };
            let name = format!("update-files/{}", rel);
            if entry.file_type().is_dir() {
                zip.add_directory(name.as_str(), options)
                    .map_err(|err| zip_error(output, err))?;
            } else {
                zip.start_file(name.as_str(), options).map_err(|err| zip_error(output, err))?;
                copy_into(entry.path(), &mut zip)
                    .map_err(|err| ArchiveError::new(output, err))?;
            }
        }
    }

    zip.finish().map_err(|err| zip_error(output, err))?;

    // Success: staging is consumed. Failure to clean up is not fatal.
    if let Err(err) = fs::remove_dir_all(&staging.root) {
        tracing::warn!("Could not delete staging dir {}: {}", staging.root.display(), err);
    }

    Ok(())
}

fn copy_into(path: &Path, zip: &mut ZipWriter<File>) -> io::Result<()> {
    let mut src = File::open(path)?;
    io::copy(&mut src, zip)?;
    Ok(())
}

fn zip_error(output: &Path, err: ZipError) -> ArchiveError {
    match err {
        ZipError::Io(io_err) => ArchiveError::new(output, io_err),
        other => ArchiveError::new(output, io::Error::other(other)),
    }
}
