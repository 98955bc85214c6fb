//! `.env` sanitization for fresh-install distribution.
//!
//! The application secret is emptied and the database block collapses to
//! generic placeholders; every other line is preserved byte-for-byte.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DB_PLACEHOLDER: [&str; 6] = [
    "DB_CONNECTION=mysql",
    "DB_HOST=127.0.0.1",
    "DB_PORT=3306",
    "DB_DATABASE=laravel",
    "DB_USERNAME=root",
    "DB_PASSWORD=",
];

/// Rewrite env content: `APP_KEY=` emptied, the first `DB_*` line replaced
/// by the placeholder block, remaining `DB_*` lines dropped.
pub fn sanitize_env(content: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut db_block_written = false;

    for line in content.lines() {
        if line.starts_with("APP_KEY=") {
            out.push("APP_KEY=".to_string());
        } else if line.starts_with("DB_") {
            if !db_block_written {
                out.extend(DB_PLACEHOLDER.iter().map(|s| s.to_string()));
                db_block_written = true;
            }
        } else {
            out.push(line.to_string());
        }
    }

    let mut result = out.join("\n");
    if content.ends_with('\n') {
        result.push('\n');
    }
    result
}

/// Sanitize the `.env` file at `root` in place.
pub fn reset_env_file(root: &Path) -> Result<()> {
    let env_path = root.join(".env");
    let content = fs::read_to_string(&env_path)
        .with_context(|| format!("reading {}", env_path.display()))?;
    fs::write(&env_path, sanitize_env(&content))
        .with_context(|| format!("writing {}", env_path.display()))
}
