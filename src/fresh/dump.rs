//! Database export via `mysqldump`.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::domain::DatabaseSettings;
use crate::error::ExternalToolError;

/// Run `mysqldump` with the configured connection parameters and write its
/// stdout verbatim to `output`.
pub fn export_database(settings: &DatabaseSettings, output: &Path) -> Result<(), ExternalToolError> {
    let mut cmd = Command::new("mysqldump");
    cmd.arg(format!("-u{}", settings.username))
        .arg("-h")
        .arg(&settings.host)
        .arg("-P")
        .arg(settings.port.to_string());
    // An empty -p would make mysqldump prompt and hang the command.
    if !settings.password.is_empty() {
        cmd.arg(format!("-p{}", settings.password));
    }
    cmd.arg(&settings.database);

    let out = cmd
        .output()
        .map_err(|err| ExternalToolError::new("mysqldump", err.to_string()))?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(ExternalToolError::new("mysqldump", stderr.trim().to_string()));
    }

    fs::write(output, &out.stdout)
        .map_err(|err| ExternalToolError::new("mysqldump", err.to_string()))
}
