//! Version and output-name helpers.

use once_cell::sync::Lazy;
use regex::Regex;

static SEMVER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid regex"));
static OUTPUT_VERSIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_v([\d.]+)_to_([\d.]+)\.zip$").expect("valid regex"));

/// Three dot-separated numeric components.
pub fn is_valid_version(version: &str) -> bool {
    SEMVER_RE.is_match(version)
}

/// Recover `(previous, new)` versions from an output name such as
/// `shop_v2.0.1_to_2.0.2.zip`.
pub fn versions_from_output_name(output: &str) -> Option<(String, String)> {
    OUTPUT_VERSIONS_RE
        .captures(output)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
}

pub fn default_output_name(from: &str, to: &str) -> String {
    format!("update_{}_to_{}.zip", from, to)
}
