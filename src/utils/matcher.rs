//! Exclusion/inclusion pattern matching.
//!
//! Three pattern forms are understood: a pattern ending in `/` matches any
//! path under that directory prefix, a pattern containing wildcards is
//! matched with shell-glob semantics against the whole path, and anything
//! else is an exact comparison (a glob without metacharacters).

use globset::GlobBuilder;

use crate::utils::paths::normalize_path;

/// Return true when `path` matches any of `patterns`.
///
/// Paths and patterns are normalized to forward slashes before comparing.
/// Directory-prefix patterns compare exactly; glob patterns honor the
/// `case_sensitive` flag. Short-circuits on the first match.
pub fn matches_any(path: &str, patterns: &[String], case_sensitive: bool) -> bool {
    let path = normalize_path(path);

    for pattern in patterns {
        let pattern = normalize_path(pattern);

        if pattern.ends_with('/') {
            if path.starts_with(&pattern) {
                return true;
            }
            continue;
        }

        // Shell-glob semantics: `*` spans directory separators, the way
        // `vendor*` is expected to catch `vendor/package/file.php`.
        let glob = GlobBuilder::new(&pattern)
            .case_insensitive(!case_sensitive)
            .literal_separator(false)
            .build();
        match glob {
            Ok(glob) => {
                if glob.compile_matcher().is_match(&path) {
                    return true;
                }
            }
            Err(err) => {
                tracing::debug!("skipping unparseable pattern '{}': {}", pattern, err);
            }
        }
    }

    false
}
