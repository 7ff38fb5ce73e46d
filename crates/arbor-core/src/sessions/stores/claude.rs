//! Claude Code session store.
//!
//! Layout: `<root>/projects/<encoded-cwd>/<session-uuid>.jsonl`, where the
//! encoding of the working directory has changed across tool versions.
//! Roots and encodings are tried in a fixed priority order; the first
//! combination yielding any candidate wins. When no project directory
//! matches, a global `<root>/history.jsonl` file is consulted as a
//! fallback.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::scan;
use crate::sessions::stores::SessionStore;
use crate::sessions::types::SessionInfo;

const HISTORY_MAX_LINES: usize = 10_000;

pub struct ClaudeStore {
    roots: Vec<PathBuf>,
}

impl ClaudeStore {
    /// Roots in priority order: `$CLAUDE_CONFIG_DIR`, `~/.claude`,
    /// `~/.config/claude`.
    pub fn from_env() -> Self {
        let mut roots = Vec::new();
        if let Ok(dir) = std::env::var("CLAUDE_CONFIG_DIR")
            && !dir.trim().is_empty()
        {
            roots.push(PathBuf::from(dir));
        }
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join(".claude"));
            roots.push(home.join(".config").join("claude"));
        }
        Self { roots }
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    fn project_dirs_for(&self, cwd: &Path) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        for root in &self.roots {
            for encoding in encode_cwd_variants(cwd) {
                dirs.push(root.join("projects").join(encoding));
            }
        }
        dirs
    }

    fn history_candidates(&self, cwd: &Path) -> Vec<SessionInfo> {
        for root in &self.roots {
            let history = root.join("history.jsonl");
            let file_mtime = scan::file_mtime(&history);
            let mut candidates = Vec::new();

            for record in scan::read_jsonl(&history, HISTORY_MAX_LINES) {
                let Some(recorded_cwd) = scan::string_field(&record, &["cwd"]) else {
                    continue;
                };
                if !scan::paths_match(Path::new(&recorded_cwd), cwd) {
                    continue;
                }
                let Some(id) = scan::string_field(&record, &["sessionId", "session_id"]) else {
                    continue;
                };
                if !scan::is_canonical_uuid(&id) {
                    continue;
                }
                let Some(mtime) =
                    scan::timestamp_field(&record, &["timestamp", "updatedAt"]).or(file_mtime)
                else {
                    continue;
                };
                candidates.push(SessionInfo { id, mtime });
            }

            if !candidates.is_empty() {
                debug!(
                    event = "core.resolver.claude_history_hit",
                    root = %root.display(),
                    count = candidates.len()
                );
                return candidates;
            }
        }
        Vec::new()
    }
}

impl SessionStore for ClaudeStore {
    fn collect(&self, cwd: Option<&Path>) -> Vec<SessionInfo> {
        let Some(cwd) = cwd else {
            // Project directories are keyed by encoded cwd; nothing to
            // search without one.
            return Vec::new();
        };

        for dir in self.project_dirs_for(cwd) {
            // Depth 2 covers both the flat layout and the `sessions/`
            // subdirectory used by older versions.
            let mut candidates = Vec::new();
            for file in scan::walk_files(&dir, 2, &["jsonl"]) {
                let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if !scan::is_canonical_uuid(stem) {
                    continue;
                }
                let Some(mtime) = scan::file_mtime(&file) else {
                    continue;
                };
                candidates.push(SessionInfo {
                    id: stem.to_string(),
                    mtime,
                });
            }

            if !candidates.is_empty() {
                debug!(
                    event = "core.resolver.claude_project_hit",
                    dir = %dir.display(),
                    count = candidates.len()
                );
                return candidates;
            }
        }

        self.history_candidates(cwd)
    }

    fn session_file_exists(&self, id: &str, cwd: &Path) -> bool {
        if !scan::is_canonical_uuid(id) {
            return false;
        }
        let file_name = format!("{id}.jsonl");
        self.project_dirs_for(cwd).iter().any(|dir| {
            dir.join(&file_name).is_file() || dir.join("sessions").join(&file_name).is_file()
        })
    }
}

/// Encode a working directory the ways Claude Code has across versions.
///
/// Returned in priority order, deduplicated:
/// 1. `/` replaced with `-`
/// 2. `/`, `.`, and `_` replaced with `-`
/// 3. the same with runs of `-` collapsed
pub fn encode_cwd_variants(cwd: &Path) -> Vec<String> {
    let raw = cwd.to_string_lossy();
    let raw = raw.trim_end_matches('/');

    let slashes_only: String = raw
        .chars()
        .map(|c| if c == '/' { '-' } else { c })
        .collect();
    let all_separators: String = raw
        .chars()
        .map(|c| match c {
            '/' | '.' | '_' => '-',
            c => c,
        })
        .collect();
    let collapsed = collapse_dashes(&all_separators);

    let mut variants = Vec::new();
    for variant in [slashes_only, all_separators, collapsed] {
        if !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    variants
}

fn collapse_dashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_dash = false;
    for c in s.chars() {
        if c == '-' {
            if !last_dash {
                out.push(c);
            }
            last_dash = true;
        } else {
            out.push(c);
            last_dash = false;
        }
    }
    out
}
