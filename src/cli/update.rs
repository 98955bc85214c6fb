//! make-update command implementation

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::utils::{default_output_name, is_valid_version, versions_from_output_name};
use crate::config::load_config;
use crate::error::ValidationError;
use crate::package::{assemble, build, categorize};
use crate::scan::enumerate_config_files;
use crate::utils::matches_any;
use crate::vcs::ChangeCollector;

#[derive(Args)]
pub struct MakeUpdateArgs {
    /// Start of the commit date range (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from_date: Option<String>,

    /// End of the commit date range (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to_date: Option<String>,

    /// Output zip file (defaults to update_<from>_to_<to>.zip)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<String>,

    /// Version the package upgrades to (e.g. 2.0.2)
    #[arg(long, value_name = "VERSION")]
    pub new_version: Option<String>,

    /// Version the package upgrades from (e.g. 2.0.1)
    #[arg(long, value_name = "VERSION")]
    pub prev_version: Option<String>,

    /// Also package files with uncommitted changes
    #[arg(long)]
    pub include_uncommitted: bool,

    /// Log every include/exclude decision
    #[arg(long)]
    pub debug_output: bool,

    /// List what would be packaged without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a rollback package (version pair swapped)
    #[arg(long)]
    pub rollback: bool,

    /// Project root (defaults to the current directory)
    #[arg(short = 'p', long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Path to config file (update-packager.toml or .yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: MakeUpdateArgs) -> Result<()> {
    let root = match args.path.as_ref() {
        Some(path) => path
            .canonicalize()
            .with_context(|| format!("Project root not found: {}", path.display()))?,
        None => std::env::current_dir()?,
    };
    let config = load_config(&root, args.config.as_deref())?;

    let (from_raw, to_raw) = match (args.from_date.as_ref(), args.to_date.as_ref()) {
        (Some(from), Some(to)) => (from.clone(), to.clone()),
        _ => {
            tracing::error!("From and to dates are required.");
            return Err(ValidationError::MissingDates.into());
        }
    };
    let from = parse_date(&from_raw)?;
    let to = parse_date(&to_raw)?;

    let today = chrono::Local::now().date_naive();
    if to > today {
        println!(
            "To date ({}) is in the future. Ensure your Git repository has commits in this range.",
            to_raw
        );
        tracing::warn!("To date ({}) is in the future.", to_raw);
    }

    let output = args.output.unwrap_or_else(|| default_output_name(&from_raw, &to_raw));

    // Versions: flags first, then the output file name, then config, then
    // a date-stamped fallback.
    let mut new_version = args.new_version;
    let mut prev_version = args.prev_version;
    if new_version.is_none() {
        if let Some((prev, new)) = versions_from_output_name(&output) {
            prev_version = prev_version.or(Some(prev));
            new_version = Some(new);
        }
    }
    let new_version = new_version
        .or_else(|| config.versioning.version.clone())
        .unwrap_or_else(|| chrono::Local::now().format("%Y.%m.%d").to_string());
    let prev_version = prev_version
        .or_else(|| config.versioning.previous_version.clone())
        .unwrap_or_else(|| "unknown".to_string());

    if !is_valid_version(&new_version) {
        tracing::error!("Invalid version format: {}", new_version);
        return Err(ValidationError::BadVersion(new_version).into());
    }
    if prev_version != "unknown" && !is_valid_version(&prev_version) {
        tracing::error!("Invalid version format: {}", prev_version);
        return Err(ValidationError::BadVersion(prev_version).into());
    }

    tracing::info!(
        "Starting update package generation: from {} to {}, version {}",
        from_raw,
        to_raw,
        new_version
    );

    // Version-control failures degrade to an empty change set; the
    // config-enumerated files can still produce a package.
    let mut changed: BTreeSet<String> = BTreeSet::new();
    match ChangeCollector::open(&root) {
        Ok(collector) => {
            match collector.changed_files(from, to) {
                Ok(files) => changed.extend(files),
                Err(err) => tracing::error!("Git log failed: {}", err),
            }
            if args.include_uncommitted {
                match collector.uncommitted_files() {
                    Ok(files) => changed.extend(files),
                    Err(err) => tracing::warn!("Git status failed: {}", err),
                }
            }
        }
        Err(err) => tracing::error!("Git repository unavailable: {}", err),
    }

    changed.extend(enumerate_config_files(&root, &config));

    if changed.is_empty() {
        println!("No files to include. Check `archive_dirs`, `single_files`, and Git history.");
        tracing::warn!("No files to include.");
        return Ok(());
    }

    let filtered: BTreeSet<String> = changed
        .into_iter()
        .filter(|file| {
            if matches_any(file, &config.exclusions, true) {
                tracing::debug!("Excluding file: {}", file);
                false
            } else {
                tracing::debug!("Including file: {}", file);
                true
            }
        })
        .collect();

    if filtered.is_empty() {
        println!("All files were excluded. Check `exclusions` in the configuration.");
        tracing::warn!("All files were excluded.");
        return Ok(());
    }

    if args.dry_run {
        println!("Dry run: simulating update package generation.");
        for file in &filtered {
            println!("  {}", file);
        }
        tracing::info!("Dry run completed: {} files.", filtered.len());
        return Ok(());
    }

    let categorized = categorize(&filtered, &config);
    let staging = build(&root, &config, &categorized, &new_version, &prev_version, args.rollback)?;
    assemble(&staging, &PathBuf::from(&output))?;

    println!("Update package generated at {}", output);
    tracing::info!("Update package generated: {}", output);
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::BadDate(raw.to_string()).into())
}
