//! Session resolver data types.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default ranking window around `prefer_closest_to`, in milliseconds
/// (30 minutes). A documented tunable, not an invariant.
pub const DEFAULT_WINDOW_MS: i64 = 1_800_000;

/// Default overall timeout for [`wait_for_session_id`], in milliseconds.
///
/// [`wait_for_session_id`]: crate::sessions::resolver::wait_for_session_id
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 120_000;

/// Default poll interval for [`wait_for_session_id`], in milliseconds.
///
/// [`wait_for_session_id`]: crate::sessions::resolver::wait_for_session_id
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// A worktree reference supplied by a caller that has already enumerated
/// worktrees itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorktreeRef {
    pub path: PathBuf,
    pub branch: String,
}

/// Query parameters for a session search.
///
/// `cwd` scopes the search to one working directory. `branch` scopes it to
/// every worktree checked out to that branch (resolved via the git gateway
/// unless `worktrees` is supplied). `since`/`until` bound candidate
/// modification times inclusively. When `prefer_closest_to` is set,
/// candidates within `window_ms` of it are ranked by closeness before
/// falling back to newest-first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSearchOptions {
    pub cwd: Option<PathBuf>,
    pub branch: Option<String>,
    pub worktrees: Option<Vec<WorktreeRef>>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub prefer_closest_to: Option<DateTime<Utc>>,
    pub window_ms: Option<i64>,
}

impl SessionSearchOptions {
    /// Options scoped to a single working directory.
    pub fn for_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
            ..Self::default()
        }
    }

    /// Options scoped to every worktree on a branch.
    pub fn for_branch(branch: impl Into<String>) -> Self {
        Self {
            branch: Some(branch.into()),
            ..Self::default()
        }
    }

    /// The effective ranking window, falling back to [`DEFAULT_WINDOW_MS`].
    pub fn effective_window_ms(&self) -> i64 {
        self.window_ms.unwrap_or(DEFAULT_WINDOW_MS)
    }
}

/// A resolved session: its identifier and the modification time of the file
/// it was found in.
///
/// `id` is always non-empty; for tools keyed by UUID it matches the
/// canonical dashed shape (malformed ids are rejected during the search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub mtime: DateTime<Utc>,
}

/// Polling parameters for [`wait_for_session_id`].
///
/// [`wait_for_session_id`]: crate::sessions::resolver::wait_for_session_id
#[derive(Debug, Clone)]
pub struct WaitOptions {
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// Time filters applied to every poll (cwd/branch scoping comes from
    /// the wait call itself).
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub prefer_closest_to: Option<DateTime<Utc>>,
    pub window_ms: Option<i64>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            since: None,
            until: None,
            prefer_closest_to: None,
            window_ms: None,
        }
    }
}
