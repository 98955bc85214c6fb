//! make-fresh command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::load_config;
use crate::fresh::{
    export_database, reset_env_file, stage_install_view, truncate_tables, MysqlRunner,
};

#[derive(Args)]
pub struct MakeFreshArgs {
    /// Output file path for the SQL dump
    #[arg(short = 'o', long, value_name = "PATH", default_value = "install.sql")]
    pub output: PathBuf,

    /// Project root (defaults to the current directory)
    #[arg(short = 'p', long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Path to config file (update-packager.toml or .yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: MakeFreshArgs) -> Result<()> {
    let root = match args.path.as_ref() {
        Some(path) => path
            .canonicalize()
            .with_context(|| format!("Project root not found: {}", path.display()))?,
        None => std::env::current_dir()?,
    };
    let config = load_config(&root, args.config.as_deref())?;

    if let Some(view) = &config.install_view {
        stage_install_view(&root, view);
    }

    // Truncation is the one fatal step: a failure here exits non-zero,
    // with foreign-key checks already re-enabled by the truncation flow.
    let mut runner = MysqlRunner::connect(&config.database)?;
    truncate_tables(&mut runner, &config.truncate_tables)?;

    if let Err(err) = export_database(&config.database, &args.output) {
        eprintln!("Database export failed: {}", err);
        tracing::error!("Database export failed: {}", err);
    }

    if let Err(err) = reset_env_file(&root) {
        tracing::warn!("Could not sanitize .env: {}", err);
    }

    println!("Fresh install SQL generated at {}", args.output.display());
    tracing::info!("Fresh install SQL generated at {}", args.output.display());
    Ok(())
}
