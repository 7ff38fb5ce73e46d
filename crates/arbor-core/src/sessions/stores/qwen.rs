//! Qwen Code session store.
//!
//! Layout: `<root>/tmp/<project-hash>/` where the project hash is the
//! SHA-256 hex of the working directory string. Checkpoint files live
//! either directly in the project directory or under `checkpoints/`; the
//! project directory is searched first. Checkpoints carry no structured id,
//! so when a file's content yields none, the file's own name (minus
//! extension) becomes the session tag - an intentional fallback, not an
//! error.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::scan;
use crate::sessions::stores::SessionStore;
use crate::sessions::types::SessionInfo;

const ID_KEYS: &[&str] = &["sessionId", "session_id", "id"];

pub struct QwenStore {
    roots: Vec<PathBuf>,
}

impl QwenStore {
    /// Root: `~/.qwen`.
    pub fn from_env() -> Self {
        let mut roots = Vec::new();
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join(".qwen"));
        }
        Self { roots }
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

/// SHA-256 hex of the working directory string, trailing slash trimmed.
pub fn project_hash(cwd: &Path) -> String {
    let raw = cwd.to_string_lossy();
    let normalized = if raw == "/" {
        raw.as_ref()
    } else {
        raw.trim_end_matches('/')
    };
    let digest = Sha256::digest(normalized.as_bytes());
    format!("{digest:x}")
}

fn candidate_from_file(file: &Path) -> Option<SessionInfo> {
    let id = scan::read_json(file)
        .and_then(|value| scan::string_field(&value, ID_KEYS))
        .or_else(|| {
            file.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
        .filter(|id| !id.is_empty())?;

    let mtime = scan::file_mtime(file)?;
    Some(SessionInfo { id, mtime })
}

impl SessionStore for QwenStore {
    fn collect(&self, cwd: Option<&Path>) -> Vec<SessionInfo> {
        let Some(cwd) = cwd else {
            // The project directory is content-addressed by cwd hash;
            // nothing to search without one.
            return Vec::new();
        };
        let hash = project_hash(cwd);

        for root in &self.roots {
            let project_dir = root.join("tmp").join(&hash);
            // Fixed priority: the project directory itself, then its
            // checkpoints subdirectory.
            for dir in [project_dir.clone(), project_dir.join("checkpoints")] {
                let candidates: Vec<SessionInfo> = scan::walk_files(&dir, 1, &["json"])
                    .iter()
                    .filter_map(|file| candidate_from_file(file))
                    .collect();

                if !candidates.is_empty() {
                    debug!(
                        event = "core.resolver.qwen_checkpoint_hit",
                        dir = %dir.display(),
                        count = candidates.len()
                    );
                    return candidates;
                }
            }
        }
        Vec::new()
    }

    fn session_file_exists(&self, id: &str, cwd: &Path) -> bool {
        if id.is_empty() {
            return false;
        }
        let hash = project_hash(cwd);
        let file_name = format!("{id}.json");
        self.roots.iter().any(|root| {
            let project_dir = root.join("tmp").join(&hash);
            project_dir.join(&file_name).is_file()
                || project_dir.join("checkpoints").join(&file_name).is_file()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_dir(root: &Path, cwd: &Path) -> PathBuf {
        root.join("tmp").join(project_hash(cwd))
    }

    #[test]
    fn test_project_hash_is_stable_and_slash_insensitive() {
        let a = project_hash(Path::new("/work/repo"));
        let b = project_hash(Path::new("/work/repo/"));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, project_hash(Path::new("/work/other")));
    }

    #[test]
    fn test_collect_uses_filename_as_session_tag() {
        let temp = TempDir::new().unwrap();
        let cwd = Path::new("/work/repo");
        let dir = project_dir(temp.path(), cwd);
        std::fs::create_dir_all(&dir).unwrap();
        // Checkpoint content has no structured id
        std::fs::write(dir.join("checkpoint-tag.json"), r#"{"history": []}"#).unwrap();

        let store = QwenStore::with_roots(vec![temp.path().to_path_buf()]);
        let candidates = store.collect(Some(cwd));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "checkpoint-tag");
    }

    #[test]
    fn test_collect_prefers_content_id_when_present() {
        let temp = TempDir::new().unwrap();
        let cwd = Path::new("/work/repo");
        let dir = project_dir(temp.path(), cwd);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("checkpoint.json"),
            r#"{"sessionId": "qwen-session-1"}"#,
        )
        .unwrap();

        let store = QwenStore::with_roots(vec![temp.path().to_path_buf()]);
        let candidates = store.collect(Some(cwd));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "qwen-session-1");
    }

    #[test]
    fn test_collect_project_dir_shadows_checkpoints() {
        let temp = TempDir::new().unwrap();
        let cwd = Path::new("/work/repo");
        let dir = project_dir(temp.path(), cwd);
        let checkpoints = dir.join("checkpoints");
        std::fs::create_dir_all(&checkpoints).unwrap();
        std::fs::write(dir.join("direct.json"), "{}").unwrap();
        std::fs::write(checkpoints.join("nested.json"), "{}").unwrap();

        let store = QwenStore::with_roots(vec![temp.path().to_path_buf()]);
        let candidates = store.collect(Some(cwd));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "direct");
    }

    #[test]
    fn test_collect_falls_back_to_checkpoints_dir() {
        let temp = TempDir::new().unwrap();
        let cwd = Path::new("/work/repo");
        let checkpoints = project_dir(temp.path(), cwd).join("checkpoints");
        std::fs::create_dir_all(&checkpoints).unwrap();
        std::fs::write(checkpoints.join("saved.json"), "{}").unwrap();

        let store = QwenStore::with_roots(vec![temp.path().to_path_buf()]);
        let candidates = store.collect(Some(cwd));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "saved");
    }

    #[test]
    fn test_collect_other_project_is_invisible() {
        let temp = TempDir::new().unwrap();
        let other = project_dir(temp.path(), Path::new("/work/other"));
        std::fs::create_dir_all(&other).unwrap();
        std::fs::write(other.join("theirs.json"), "{}").unwrap();

        let store = QwenStore::with_roots(vec![temp.path().to_path_buf()]);
        assert!(store.collect(Some(Path::new("/work/repo"))).is_empty());
    }

    #[test]
    fn test_session_file_exists() {
        let temp = TempDir::new().unwrap();
        let cwd = Path::new("/work/repo");
        let checkpoints = project_dir(temp.path(), cwd).join("checkpoints");
        std::fs::create_dir_all(&checkpoints).unwrap();
        std::fs::write(checkpoints.join("saved.json"), "{}").unwrap();

        let store = QwenStore::with_roots(vec![temp.path().to_path_buf()]);
        assert!(store.session_file_exists("saved", cwd));
        assert!(!store.session_file_exists("missing", cwd));
        assert!(!store.session_file_exists("saved", Path::new("/work/other")));
    }
}
