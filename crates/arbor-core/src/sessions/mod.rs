//! Session resolver: locate coding-agent session ids on disk.
//!
//! After an agent process exits, the session id it created lives somewhere
//! in that tool's own storage. Each supported tool gets a store strategy in
//! [`stores`]; [`resolver`] drives the search (cwd, branch, or explicit
//! worktree scope), unions candidates, and ranks them with the shared
//! time-window heuristic in [`ranking`].
//!
//! The resolver is read-only and idempotent. It never writes to another
//! tool's storage and holds no locks.

pub mod errors;
pub mod ranking;
pub mod resolver;
pub mod stores;
pub mod types;

// Re-export commonly used types and functions
pub use errors::SessionError;
pub use resolver::{
    find_latest_session, find_latest_session_id, session_file_exists, wait_for_session_id,
};
pub use types::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS, DEFAULT_WINDOW_MS, SessionInfo,
    SessionSearchOptions, WaitOptions, WorktreeRef,
};
