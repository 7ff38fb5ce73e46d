//! Bounded, error-swallowing directory walks and file metadata probes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use walkdir::WalkDir;

/// Collect regular files under `dir`, up to `max_depth` levels deep, whose
/// extension matches one of `extensions` (without the leading dot).
///
/// An empty `extensions` slice matches every file. Unreadable entries are
/// skipped; a missing or unreadable `dir` yields an empty list.
pub fn walk_files(dir: &Path, max_depth: usize, extensions: &[&str]) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| extensions.is_empty() || has_extension(path, extensions))
        .collect()
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Read a file's modification time as a UTC timestamp.
///
/// Returns `None` if the file is missing or its metadata is unreadable.
pub fn file_mtime(path: &Path) -> Option<DateTime<Utc>> {
    let metadata = std::fs::metadata(path).ok()?;
    let modified = metadata.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_walk_files_missing_dir_is_empty() {
        let files = walk_files(Path::new("/nonexistent/arbor-test-dir"), 3, &["json"]);
        assert!(files.is_empty());
    }

    #[test]
    fn test_walk_files_filters_by_extension() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.json"), "{}").unwrap();
        std::fs::write(temp.path().join("b.jsonl"), "{}").unwrap();
        std::fs::write(temp.path().join("c.txt"), "nope").unwrap();

        let files = walk_files(temp.path(), 1, &["json", "jsonl"]);
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| {
            let ext = p.extension().unwrap().to_str().unwrap();
            ext == "json" || ext == "jsonl"
        }));
    }

    #[test]
    fn test_walk_files_respects_max_depth() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("one").join("two");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join("top.json"), "{}").unwrap();
        std::fs::write(nested.join("deep.json"), "{}").unwrap();

        let shallow = walk_files(temp.path(), 1, &["json"]);
        assert_eq!(shallow.len(), 1);

        let deep = walk_files(temp.path(), 3, &["json"]);
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_walk_files_empty_extension_list_matches_all() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.json"), "{}").unwrap();
        std::fs::write(temp.path().join("b"), "no extension").unwrap();

        let files = walk_files(temp.path(), 1, &[]);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_file_mtime_present_and_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stamp.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(file_mtime(&path).is_some());
        assert!(file_mtime(&temp.path().join("missing.json")).is_none());
    }
}
