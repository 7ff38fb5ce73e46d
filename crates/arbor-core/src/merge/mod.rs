//! Batch merge orchestrator: synchronize feature branches with a source
//! branch across their worktrees.
//!
//! One sequential pass per run - worktrees share repository-level refs and
//! index locks, so branches are processed strictly one at a time, with a
//! progress snapshot per branch and a cooperative cancellation check
//! between branches. Conflicts skip a branch, never the batch.

pub mod errors;
pub mod orchestrator;
pub mod progress;
pub mod types;

// Re-export commonly used types and functions
pub use errors::MergeError;
pub use orchestrator::{BatchMergeOrchestrator, never_cancelled};
pub use progress::{ChannelSink, NullSink, ProgressSink};
pub use types::{
    BatchMergeConfig, BatchMergeResult, BatchMergeSummary, BranchMergeStatus, MergeOutcome,
    MergeProgress, PushStatus,
};
