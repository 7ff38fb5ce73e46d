//! Working-directory string comparison.

use std::path::Path;

/// Compare two paths for equality, tolerating trailing slashes and symlinked
/// prefixes.
///
/// Session files record the working directory as an opaque string; the
/// stored form may differ from the caller's by a trailing separator or a
/// resolved symlink (e.g. `/tmp` vs `/private/tmp`). Comparison is by
/// normalized string first, canonicalized form second. Canonicalization
/// failures (missing paths) fall back to the string comparison result.
pub fn paths_match(a: &Path, b: &Path) -> bool {
    let norm_a = normalize(a);
    let norm_b = normalize(b);
    if norm_a == norm_b {
        return true;
    }

    match (a.canonicalize(), b.canonicalize()) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

fn normalize(path: &Path) -> String {
    let s = path.to_string_lossy();
    let trimmed = s.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_paths_match_exact() {
        assert!(paths_match(
            Path::new("/work/repo"),
            Path::new("/work/repo")
        ));
    }

    #[test]
    fn test_paths_match_trailing_slash() {
        assert!(paths_match(
            Path::new("/work/repo/"),
            Path::new("/work/repo")
        ));
    }

    #[test]
    fn test_paths_match_root() {
        assert!(paths_match(Path::new("/"), Path::new("/")));
    }

    #[test]
    fn test_paths_do_not_match() {
        assert!(!paths_match(
            Path::new("/work/repo"),
            Path::new("/work/other")
        ));
    }

    #[test]
    fn test_paths_match_through_symlink() {
        let temp = tempfile::TempDir::new().unwrap();
        let real = temp.path().join("real");
        std::fs::create_dir(&real).unwrap();

        let link = temp.path().join("link");
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(&real, &link).unwrap();
            assert!(paths_match(&link, &real));
        }
        let _ = link;
    }

    #[test]
    fn test_paths_match_missing_paths_fall_back_to_strings() {
        let a = PathBuf::from("/nonexistent/arbor/a");
        let b = PathBuf::from("/nonexistent/arbor/a/");
        assert!(paths_match(&a, &b));

        let c = PathBuf::from("/nonexistent/arbor/c");
        assert!(!paths_match(&a, &c));
    }
}
