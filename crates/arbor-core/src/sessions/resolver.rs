//! Session search driver.
//!
//! Resolves the search scope (explicit cwd, explicit worktree list, or a
//! branch resolved to worktree paths through the git gateway), collects
//! candidates from the agent's store strategy, and ranks them with the
//! shared windowing heuristic.
//!
//! "Not found" is `Ok(None)` throughout; per-candidate I/O failures are
//! swallowed by the stores. The only errors raised here are invalid
//! options.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::agents::AgentType;
use crate::git::GitGateway;
use crate::sessions::errors::SessionError;
use crate::sessions::ranking::select_candidate;
use crate::sessions::stores::{SessionStore, store_for};
use crate::sessions::types::{SessionInfo, SessionSearchOptions, WaitOptions};

/// The working directories a search spans.
enum SearchScope {
    /// A branch filter matched no worktree: the search terminates with no
    /// result, never falling back to an unrelated cwd.
    NoMatch,
    Cwds(Vec<PathBuf>),
    Unscoped,
}

fn validate_options(options: &SessionSearchOptions) -> Result<(), SessionError> {
    if let Some(window_ms) = options.window_ms
        && window_ms <= 0
    {
        return Err(SessionError::InvalidOptions {
            message: format!("window_ms must be positive, got {window_ms}"),
        });
    }
    Ok(())
}

fn resolve_scope(options: &SessionSearchOptions, git: &dyn GitGateway) -> SearchScope {
    if let Some(worktrees) = &options.worktrees {
        let paths: Vec<PathBuf> = worktrees
            .iter()
            .filter(|w| {
                options
                    .branch
                    .as_deref()
                    .is_none_or(|branch| w.branch == branch)
            })
            .map(|w| w.path.clone())
            .collect();
        if paths.is_empty() {
            return SearchScope::NoMatch;
        }
        return SearchScope::Cwds(paths);
    }

    if let Some(branch) = &options.branch {
        let worktrees = match git.list_worktrees() {
            Ok(list) => list,
            Err(e) => {
                debug!(
                    event = "core.resolver.worktree_list_failed",
                    branch = branch.as_str(),
                    error = %e,
                    "Worktree enumeration failed - treating as no match"
                );
                return SearchScope::NoMatch;
            }
        };
        let paths: Vec<PathBuf> = worktrees
            .into_iter()
            .filter(|w| w.branch.as_deref() == Some(branch.as_str()))
            .map(|w| w.path)
            .collect();
        if paths.is_empty() {
            debug!(
                event = "core.resolver.no_worktree_for_branch",
                branch = branch.as_str()
            );
            return SearchScope::NoMatch;
        }
        return SearchScope::Cwds(paths);
    }

    match &options.cwd {
        Some(cwd) => SearchScope::Cwds(vec![cwd.clone()]),
        None => SearchScope::Unscoped,
    }
}

fn search_with_store(
    store: &dyn SessionStore,
    options: &SessionSearchOptions,
    git: &dyn GitGateway,
) -> Result<Option<SessionInfo>, SessionError> {
    validate_options(options)?;

    let candidates = match resolve_scope(options, git) {
        SearchScope::NoMatch => return Ok(None),
        SearchScope::Cwds(paths) => {
            // Union of per-path results; duplicates collapse during ranking.
            let mut all = Vec::new();
            for path in &paths {
                all.extend(store.collect(Some(path.as_path())));
            }
            all
        }
        SearchScope::Unscoped => store.collect(None),
    };

    Ok(select_candidate(candidates, options))
}

/// Locate the most plausible session for an agent, or `None`.
///
/// Any I/O error, missing directory, or malformed file along the way is
/// treated as "no candidate from this source"; the search never fails for
/// those reasons.
pub fn find_latest_session(
    agent: AgentType,
    options: &SessionSearchOptions,
    git: &dyn GitGateway,
) -> Result<Option<SessionInfo>, SessionError> {
    let store = store_for(agent);
    let result = search_with_store(store.as_ref(), options, git)?;

    info!(
        event = "core.resolver.search_completed",
        agent = %agent,
        found = result.is_some()
    );

    Ok(result)
}

/// Convenience wrapper around [`find_latest_session`] returning only the id.
pub fn find_latest_session_id(
    agent: AgentType,
    options: &SessionSearchOptions,
    git: &dyn GitGateway,
) -> Result<Option<String>, SessionError> {
    Ok(find_latest_session(agent, options, git)?.map(|info| info.id))
}

/// Poll for a session id in a working directory until one appears or the
/// timeout elapses.
///
/// Blocks the calling thread, sleeping between polls; run it on a dedicated
/// worker, not a thread servicing UI or request handling. Cancellation is
/// by timeout only - callers needing early cancellation race this against
/// their own signal.
pub fn wait_for_session_id(
    agent: AgentType,
    cwd: &Path,
    wait: &WaitOptions,
) -> Result<Option<String>, SessionError> {
    let store = store_for(agent);
    wait_with_store(store.as_ref(), agent, cwd, wait)
}

fn wait_with_store(
    store: &dyn SessionStore,
    agent: AgentType,
    cwd: &Path,
    wait: &WaitOptions,
) -> Result<Option<String>, SessionError> {
    if wait.poll_interval_ms == 0 {
        return Err(SessionError::InvalidOptions {
            message: "poll_interval_ms must be greater than zero".to_string(),
        });
    }

    let options = SessionSearchOptions {
        cwd: Some(cwd.to_path_buf()),
        since: wait.since,
        until: wait.until,
        prefer_closest_to: wait.prefer_closest_to,
        window_ms: wait.window_ms,
        ..SessionSearchOptions::default()
    };
    validate_options(&options)?;

    info!(
        event = "core.resolver.wait_started",
        agent = %agent,
        cwd = %cwd.display(),
        timeout_ms = wait.timeout_ms,
        poll_interval_ms = wait.poll_interval_ms
    );

    let deadline = Instant::now() + Duration::from_millis(wait.timeout_ms);
    loop {
        let candidates = store.collect(Some(cwd));
        if let Some(found) = select_candidate(candidates, &options) {
            info!(
                event = "core.resolver.wait_completed",
                agent = %agent,
                session_id = found.id.as_str()
            );
            return Ok(Some(found.id));
        }

        let now = Instant::now();
        if now >= deadline {
            info!(event = "core.resolver.wait_timed_out", agent = %agent);
            return Ok(None);
        }

        let remaining = deadline - now;
        std::thread::sleep(remaining.min(Duration::from_millis(wait.poll_interval_ms)));
    }
}

/// Check whether a session file for a persisted id still exists under the
/// agent's store for a worktree, before a resume operation trusts the id.
pub fn session_file_exists(agent: AgentType, id: &str, cwd: &Path) -> bool {
    if id.trim().is_empty() {
        return false;
    }
    store_for(agent).session_file_exists(id, cwd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::errors::GitError;
    use crate::git::types::{BranchEntry, WorktreeCreateRequest, WorktreeEntry};
    use crate::sessions::types::WorktreeRef;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(ms).unwrap()
    }

    /// Store stub mapping cwd strings to fixed candidates.
    struct MapStore {
        by_cwd: HashMap<PathBuf, Vec<SessionInfo>>,
        unscoped: Vec<SessionInfo>,
    }

    impl MapStore {
        fn new() -> Self {
            Self {
                by_cwd: HashMap::new(),
                unscoped: Vec::new(),
            }
        }

        fn with(mut self, cwd: &str, id: &str, ms: i64) -> Self {
            self.by_cwd
                .entry(PathBuf::from(cwd))
                .or_default()
                .push(SessionInfo {
                    id: id.to_string(),
                    mtime: at(ms),
                });
            self
        }
    }

    impl SessionStore for MapStore {
        fn collect(&self, cwd: Option<&Path>) -> Vec<SessionInfo> {
            match cwd {
                Some(cwd) => self.by_cwd.get(cwd).cloned().unwrap_or_default(),
                None => self.unscoped.clone(),
            }
        }

        fn session_file_exists(&self, id: &str, cwd: &Path) -> bool {
            self.by_cwd
                .get(cwd)
                .is_some_and(|list| list.iter().any(|c| c.id == id))
        }
    }

    /// Gateway stub: only worktree listing is exercised by the resolver.
    struct StubGit {
        worktrees: Vec<WorktreeEntry>,
        fail_listing: bool,
    }

    impl StubGit {
        fn with_worktrees(worktrees: Vec<(&str, &str)>) -> Self {
            Self {
                worktrees: worktrees
                    .into_iter()
                    .map(|(path, branch)| WorktreeEntry {
                        path: PathBuf::from(path),
                        branch: Some(branch.to_string()),
                    })
                    .collect(),
                fail_listing: false,
            }
        }

        fn failing() -> Self {
            Self {
                worktrees: Vec::new(),
                fail_listing: true,
            }
        }
    }

    impl GitGateway for StubGit {
        fn list_local_branches(&self) -> Result<Vec<BranchEntry>, GitError> {
            panic!("not used by the resolver")
        }

        fn list_worktrees(&self) -> Result<Vec<WorktreeEntry>, GitError> {
            if self.fail_listing {
                return Err(GitError::OperationFailed {
                    message: "listing failed".to_string(),
                });
            }
            Ok(self.worktrees.clone())
        }

        fn create_worktree(&self, _request: &WorktreeCreateRequest) -> Result<(), GitError> {
            panic!("not used by the resolver")
        }

        fn remove_worktree(&self, _path: &Path, _force: bool) -> Result<(), GitError> {
            panic!("not used by the resolver")
        }

        fn merge_from_branch(
            &self,
            _worktree_path: &Path,
            _source_branch: &str,
            _dry_run: bool,
        ) -> Result<(), GitError> {
            panic!("not used by the resolver")
        }

        fn has_merge_conflict(&self, _worktree_path: &Path) -> bool {
            panic!("not used by the resolver")
        }

        fn abort_merge(&self, _worktree_path: &Path) -> Result<(), GitError> {
            panic!("not used by the resolver")
        }

        fn reset_to_head(&self, _worktree_path: &Path) -> Result<(), GitError> {
            panic!("not used by the resolver")
        }

        fn fetch_all_remotes(&self) -> Result<(), GitError> {
            panic!("not used by the resolver")
        }

        fn current_branch_name(&self, _worktree_path: &Path) -> Result<String, GitError> {
            panic!("not used by the resolver")
        }

        fn push_branch(
            &self,
            _worktree_path: &Path,
            _branch: &str,
            _remote: &str,
        ) -> Result<(), GitError> {
            panic!("not used by the resolver")
        }

        fn repository_root(&self) -> Result<PathBuf, GitError> {
            panic!("not used by the resolver")
        }

        fn worktree_path_for(&self, _repo_root: &Path, _branch: &str) -> PathBuf {
            panic!("not used by the resolver")
        }
    }

    #[test]
    fn test_cwd_search_finds_newest() {
        let store = MapStore::new()
            .with("/work/repo", "old", 1_000)
            .with("/work/repo", "new", 9_000);
        let git = StubGit::with_worktrees(vec![]);

        let options = SessionSearchOptions::for_cwd("/work/repo");
        let found = search_with_store(&store, &options, &git).unwrap().unwrap();
        assert_eq!(found.id, "new");
    }

    #[test]
    fn test_branch_resolves_to_worktrees_and_unions() {
        let store = MapStore::new()
            .with("/wt/a", "session-a", 1_000)
            .with("/wt/b", "session-b", 9_000);
        let git = StubGit::with_worktrees(vec![
            ("/wt/a", "feature/x"),
            ("/wt/b", "feature/x"),
            ("/wt/c", "other"),
        ]);

        let options = SessionSearchOptions::for_branch("feature/x");
        let found = search_with_store(&store, &options, &git).unwrap().unwrap();
        assert_eq!(found.id, "session-b");
    }

    #[test]
    fn test_branch_without_matching_worktree_is_none() {
        let store = MapStore::new().with("/wt/a", "session-a", 1_000);
        let git = StubGit::with_worktrees(vec![("/wt/a", "other")]);

        let options = SessionSearchOptions::for_branch("feature/x");
        assert_eq!(search_with_store(&store, &options, &git).unwrap(), None);
    }

    #[test]
    fn test_branch_with_failing_worktree_listing_is_none() {
        let store = MapStore::new().with("/wt/a", "session-a", 1_000);
        let git = StubGit::failing();

        let options = SessionSearchOptions::for_branch("feature/x");
        assert_eq!(search_with_store(&store, &options, &git).unwrap(), None);
    }

    #[test]
    fn test_explicit_worktrees_filtered_by_branch() {
        let store = MapStore::new()
            .with("/wt/a", "session-a", 9_000)
            .with("/wt/b", "session-b", 1_000);
        // Git enumeration must not be consulted when worktrees are given
        let git = StubGit::failing();

        let options = SessionSearchOptions {
            branch: Some("feature/x".to_string()),
            worktrees: Some(vec![
                WorktreeRef {
                    path: PathBuf::from("/wt/a"),
                    branch: "other".to_string(),
                },
                WorktreeRef {
                    path: PathBuf::from("/wt/b"),
                    branch: "feature/x".to_string(),
                },
            ]),
            ..SessionSearchOptions::default()
        };
        let found = search_with_store(&store, &options, &git).unwrap().unwrap();
        assert_eq!(found.id, "session-b");
    }

    #[test]
    fn test_explicit_worktrees_without_branch_search_all() {
        let store = MapStore::new()
            .with("/wt/a", "session-a", 9_000)
            .with("/wt/b", "session-b", 1_000);
        let git = StubGit::failing();

        let options = SessionSearchOptions {
            worktrees: Some(vec![
                WorktreeRef {
                    path: PathBuf::from("/wt/a"),
                    branch: "one".to_string(),
                },
                WorktreeRef {
                    path: PathBuf::from("/wt/b"),
                    branch: "two".to_string(),
                },
            ]),
            ..SessionSearchOptions::default()
        };
        let found = search_with_store(&store, &options, &git).unwrap().unwrap();
        assert_eq!(found.id, "session-a");
    }

    #[test]
    fn test_invalid_window_is_an_error() {
        let store = MapStore::new();
        let git = StubGit::with_worktrees(vec![]);
        let options = SessionSearchOptions {
            window_ms: Some(0),
            ..SessionSearchOptions::default()
        };
        assert!(search_with_store(&store, &options, &git).is_err());
    }

    #[test]
    fn test_wait_returns_immediately_when_present() {
        let store = MapStore::new().with("/work/repo", "session-a", 1_000);
        let wait = WaitOptions {
            timeout_ms: 5_000,
            poll_interval_ms: 10,
            ..WaitOptions::default()
        };

        let started = Instant::now();
        let found =
            wait_with_store(&store, AgentType::Claude, Path::new("/work/repo"), &wait).unwrap();
        assert_eq!(found, Some("session-a".to_string()));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_wait_times_out_with_none() {
        let store = MapStore::new();
        let wait = WaitOptions {
            timeout_ms: 50,
            poll_interval_ms: 10,
            ..WaitOptions::default()
        };

        let found =
            wait_with_store(&store, AgentType::Claude, Path::new("/work/repo"), &wait).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_wait_zero_poll_interval_is_an_error() {
        let store = MapStore::new();
        let wait = WaitOptions {
            poll_interval_ms: 0,
            ..WaitOptions::default()
        };

        let result = wait_with_store(&store, AgentType::Claude, Path::new("/work/repo"), &wait);
        assert!(matches!(
            result.unwrap_err(),
            SessionError::InvalidOptions { .. }
        ));
    }

    #[test]
    fn test_session_file_exists_rejects_blank_id() {
        assert!(!session_file_exists(
            AgentType::Claude,
            "  ",
            Path::new("/work/repo")
        ));
    }
}
