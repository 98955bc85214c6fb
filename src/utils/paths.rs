//! Path normalization

/// Convert backslashes to forward slashes.
///
/// Every path stored in a change set, manifest, or staging plan goes
/// through this first; comparisons elsewhere assume forward slashes.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Parent directory of a normalized relative path, or `None` when the
/// path sits at the repository root.
pub fn parent_dir(path: &str) -> Option<&str> {
    match path.rfind('/') {
        Some(idx) if idx > 0 => Some(&path[..idx]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_backslashes() {
        assert_eq!(normalize_path("app\\Models\\User.php"), "app/Models/User.php");
        assert_eq!(normalize_path("routes/web.php"), "routes/web.php");
    }

    #[test]
    fn parent_dir_of_nested_path() {
        assert_eq!(parent_dir("app/Models/User.php"), Some("app/Models"));
        assert_eq!(parent_dir("config/app.php"), Some("config"));
    }

    #[test]
    fn parent_dir_of_root_file_is_none() {
        assert_eq!(parent_dir("composer.json"), None);
        assert_eq!(parent_dir("/weird"), None);
    }
}
