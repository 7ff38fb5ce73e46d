//! OpenCode session store.
//!
//! Layout: `<root>/storage/session/<projectId>/<sessionId>.json`, a
//! content-addressed per-project store. Each session file carries the
//! working directory in its `directory` field.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::scan;
use crate::sessions::stores::SessionStore;
use crate::sessions::types::SessionInfo;

pub struct OpencodeStore {
    roots: Vec<PathBuf>,
}

impl OpencodeStore {
    /// Roots in priority order: `$XDG_DATA_HOME/opencode`,
    /// `~/.local/share/opencode`.
    pub fn from_env() -> Self {
        let mut roots = Vec::new();
        if let Ok(dir) = std::env::var("XDG_DATA_HOME")
            && !dir.trim().is_empty()
        {
            roots.push(PathBuf::from(dir).join("opencode"));
        }
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join(".local").join("share").join("opencode"));
        }
        Self { roots }
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

fn candidate_for_cwd(file: &Path, cwd: &Path) -> Option<SessionInfo> {
    let value = scan::read_json(file)?;

    let directory = scan::string_field(&value, &["directory", "cwd"])?;
    if !scan::paths_match(Path::new(&directory), cwd) {
        return None;
    }

    let id = scan::string_field(&value, &["id"]).or_else(|| {
        file.file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
    })?;
    if id.is_empty() {
        return None;
    }

    let mtime = scan::file_mtime(file)?;
    Some(SessionInfo { id, mtime })
}

impl SessionStore for OpencodeStore {
    fn collect(&self, cwd: Option<&Path>) -> Vec<SessionInfo> {
        let Some(cwd) = cwd else {
            return Vec::new();
        };

        for root in &self.roots {
            let session_dir = root.join("storage").join("session");
            let candidates: Vec<SessionInfo> = scan::walk_files(&session_dir, 2, &["json"])
                .iter()
                .filter_map(|file| candidate_for_cwd(file, cwd))
                .collect();

            if !candidates.is_empty() {
                debug!(
                    event = "core.resolver.opencode_storage_hit",
                    dir = %session_dir.display(),
                    count = candidates.len()
                );
                return candidates;
            }
        }
        Vec::new()
    }

    fn session_file_exists(&self, id: &str, cwd: &Path) -> bool {
        if id.is_empty() {
            return false;
        }
        self.roots.iter().any(|root| {
            scan::walk_files(&root.join("storage").join("session"), 2, &["json"])
                .iter()
                .filter(|file| {
                    file.file_stem()
                        .and_then(|s| s.to_str())
                        .is_some_and(|stem| stem == id)
                })
                .any(|file| candidate_for_cwd(file, cwd).is_some())
        })
    }
}
