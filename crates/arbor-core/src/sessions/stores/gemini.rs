//! Gemini session store.
//!
//! Layout: `<root>/tmp/<project-hash>/` directories holding JSON and JSONL
//! session files. The working directory is embedded in file content rather
//! than the filename, so matching requires reading each candidate file and
//! probing its records for a cwd field.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::scan;
use crate::sessions::stores::SessionStore;
use crate::sessions::types::SessionInfo;

const CWD_KEYS: &[&str] = &["cwd", "projectPath", "directory"];
const ID_KEYS: &[&str] = &["sessionId", "session_id", "id"];
const JSONL_MAX_LINES: usize = 500;

pub struct GeminiStore {
    roots: Vec<PathBuf>,
}

impl GeminiStore {
    /// Root: `~/.gemini`.
    pub fn from_env() -> Self {
        let mut roots = Vec::new();
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join(".gemini"));
        }
        Self { roots }
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

/// Flatten a session file into its records: a JSONL file yields its lines,
/// a JSON array its elements, a JSON object itself.
fn file_records(file: &Path) -> Vec<Value> {
    let is_jsonl = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jsonl"));

    if is_jsonl {
        return scan::read_jsonl(file, JSONL_MAX_LINES);
    }

    match scan::read_json(file) {
        Some(Value::Array(records)) => records,
        Some(value) => vec![value],
        None => Vec::new(),
    }
}

/// Extract a session candidate from a file whose content names `cwd`.
fn candidate_for_cwd(file: &Path, cwd: &Path) -> Option<SessionInfo> {
    let records = file_records(file);

    let matches_cwd = records.iter().any(|record| {
        scan::string_field(record, CWD_KEYS)
            .is_some_and(|recorded| scan::paths_match(Path::new(&recorded), cwd))
    });
    if !matches_cwd {
        return None;
    }

    let id = records
        .iter()
        .find_map(|record| scan::string_field(record, ID_KEYS))?;
    let mtime = scan::file_mtime(file)?;
    Some(SessionInfo { id, mtime })
}

impl SessionStore for GeminiStore {
    fn collect(&self, cwd: Option<&Path>) -> Vec<SessionInfo> {
        let Some(cwd) = cwd else {
            // Matching is by cwd embedded in content; an unscoped search
            // has nothing to compare against.
            return Vec::new();
        };

        for root in &self.roots {
            let tmp = root.join("tmp");
            let candidates: Vec<SessionInfo> = scan::walk_files(&tmp, 3, &["json", "jsonl"])
                .iter()
                .filter_map(|file| candidate_for_cwd(file, cwd))
                .collect();

            if !candidates.is_empty() {
                debug!(
                    event = "core.resolver.gemini_tmp_hit",
                    dir = %tmp.display(),
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
            scan::walk_files(&root.join("tmp"), 3, &["json", "jsonl"])
                .iter()
                .any(|file| {
                    let stem_matches = file
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .is_some_and(|stem| stem.contains(id));
                    if stem_matches {
                        return true;
                    }
                    candidate_for_cwd(file, cwd).is_some_and(|info| info.id == id)
                })
        })
    }
}
