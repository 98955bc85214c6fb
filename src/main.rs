//! update-packager CLI entry point

use anyhow::Result;

fn main() -> Result<()> {
    update_packager::cli::run()
}
