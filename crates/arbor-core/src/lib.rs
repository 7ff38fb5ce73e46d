//! arbor-core: Core library for git worktree and agent session management
//!
//! This library provides the business logic for binding git worktrees to
//! coding-agent sessions and resuming those sessions later. It is consumed
//! by the CLI and by any front-end that renders its results.
//!
//! # Main Entry Points
//!
//! - [`sessions`] - Locate agent session ids on disk, poll for new ones
//! - [`merge`] - Batch-merge a source branch across worktrees
//! - [`git`] - Git/worktree primitives and the gateway seam
//! - [`agents`] - Agent identity and availability
//! - [`config`] - Configuration management

pub mod agents;
pub mod config;
pub mod errors;
pub mod git;
pub mod logging;
pub mod merge;
pub mod scan;
pub mod sessions;

// Re-export commonly used types at crate root for convenience
pub use agents::{AgentBackend, AgentError, AgentType};
pub use config::ArborConfig;
pub use errors::{ArborError, ArborResult, ConfigError};
pub use git::{BranchEntry, BranchKind, GitError, GitGateway, SystemGit, WorktreeEntry};
pub use merge::{
    BatchMergeConfig, BatchMergeOrchestrator, BatchMergeResult, BranchMergeStatus, MergeError,
    MergeOutcome, MergeProgress, ProgressSink, PushStatus,
};
pub use sessions::{
    SessionError, SessionInfo, SessionSearchOptions, WaitOptions, WorktreeRef,
    find_latest_session, find_latest_session_id, session_file_exists, wait_for_session_id,
};

// Re-export logging initialization
pub use logging::init_logging;
