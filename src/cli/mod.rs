//! Command-line interface for update-packager
//!
//! Provides `make-update` and `make-fresh` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod fresh;
mod update;
mod utils;

/// Package git date-range changes into versioned update archives
#[derive(Parser)]
#[command(name = "update-packager")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an update or rollback package from a git date range
    MakeUpdate(Box<update::MakeUpdateArgs>),

    /// Generate a fresh-install SQL dump and sanitize .env
    MakeFresh(fresh::MakeFreshArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let debug_requested = cli.verbose
        || matches!(&cli.command, Commands::MakeUpdate(args) if args.debug_output);

    // Wire the verbosity flags to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose and
    // --debug-output fall back to DEBUG.
    let filter = if debug_requested {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::MakeUpdate(args) => update::run(*args),
        Commands::MakeFresh(args) => fresh::run(args),
    }
}
