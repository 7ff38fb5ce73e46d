//! Codex CLI session store.
//!
//! Layout: a single `<root>/sessions` directory of rollout files, flat in
//! older versions and date-nested in newer ones. There is no working
//! directory key; matching is newest-by-mtime with the caller's time
//! filters. Session ids are embedded in the rollout filename, with the
//! first record of the file as a fallback.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::scan;
use crate::sessions::stores::SessionStore;
use crate::sessions::types::SessionInfo;

/// Date nesting is at most `sessions/YYYY/MM/DD/<file>`.
const SESSIONS_WALK_DEPTH: usize = 4;

pub struct CodexStore {
    roots: Vec<PathBuf>,
}

impl CodexStore {
    /// Roots in priority order: `$CODEX_HOME`, `~/.codex`.
    pub fn from_env() -> Self {
        let mut roots = Vec::new();
        if let Ok(dir) = std::env::var("CODEX_HOME")
            && !dir.trim().is_empty()
        {
            roots.push(PathBuf::from(dir));
        }
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join(".codex"));
        }
        Self { roots }
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

fn candidate_from_file(file: &Path) -> Option<SessionInfo> {
    let stem = file.file_stem()?.to_str()?;

    let id = scan::extract_uuid(stem).or_else(|| {
        // No id in the filename: probe the first record of the rollout
        scan::read_jsonl(file, 1)
            .first()
            .and_then(|record| scan::string_field(record, &["id", "session_id"]))
            .filter(|id| scan::is_canonical_uuid(id))
    })?;

    let mtime = scan::file_mtime(file)?;
    Some(SessionInfo { id, mtime })
}

impl SessionStore for CodexStore {
    fn collect(&self, _cwd: Option<&Path>) -> Vec<SessionInfo> {
        for root in &self.roots {
            let sessions_dir = root.join("sessions");
            let candidates: Vec<SessionInfo> =
                scan::walk_files(&sessions_dir, SESSIONS_WALK_DEPTH, &["jsonl", "json"])
                    .iter()
                    .filter_map(|file| candidate_from_file(file))
                    .collect();

            if !candidates.is_empty() {
                debug!(
                    event = "core.resolver.codex_sessions_hit",
                    dir = %sessions_dir.display(),
                    count = candidates.len()
                );
                return candidates;
            }
        }
        Vec::new()
    }

    fn session_file_exists(&self, id: &str, _cwd: &Path) -> bool {
        if !scan::is_canonical_uuid(id) {
            return false;
        }
        self.roots.iter().any(|root| {
            scan::walk_files(&root.join("sessions"), SESSIONS_WALK_DEPTH, &["jsonl", "json"])
                .iter()
                .any(|file| {
                    file.file_stem()
                        .and_then(|s| s.to_str())
                        .is_some_and(|stem| stem.contains(id))
                })
        })
    }
}
