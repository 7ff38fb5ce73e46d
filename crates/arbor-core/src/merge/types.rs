//! Batch merge data types.

use serde::{Deserialize, Serialize};

use crate::merge::errors::MergeError;

/// Per-branch merge outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeOutcome {
    Success,
    Skipped,
    Failed,
}

/// Per-branch push outcome.
///
/// `NotExecuted` unless auto-push was configured and the merge succeeded
/// on a non-dry run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushStatus {
    Success,
    Failed,
    NotExecuted,
}

/// Configuration for one batch merge run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMergeConfig {
    pub source_branch: String,
    pub target_branches: Vec<String>,
    pub dry_run: bool,
    pub auto_push: bool,
    /// Required when `auto_push` is set.
    pub remote: Option<String>,
}

impl BatchMergeConfig {
    /// Check configuration preconditions before any worktree is touched.
    pub fn validate(&self) -> Result<(), MergeError> {
        if self.target_branches.is_empty() {
            return Err(MergeError::InvalidConfig {
                message: "target_branches must not be empty".to_string(),
            });
        }
        if self.auto_push && self.remote.as_deref().is_none_or(str::is_empty) {
            return Err(MergeError::RemoteRequired);
        }
        Ok(())
    }
}

/// The immutable record of one processed branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchMergeStatus {
    pub branch_name: String,
    pub status: MergeOutcome,
    pub worktree_created: bool,
    pub push_status: PushStatus,
    pub error: Option<String>,
}

/// Aggregate counts over a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMergeSummary {
    pub total_count: usize,
    pub success_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
}

/// The complete report of a batch run, returned to and owned by the caller.
///
/// `statuses.len() == summary.total_count` unless `cancelled` truncated the
/// run, in which case the remaining target branches are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMergeResult {
    pub statuses: Vec<BranchMergeStatus>,
    pub summary: BatchMergeSummary,
    pub cancelled: bool,
}

impl BatchMergeResult {
    pub fn new(statuses: Vec<BranchMergeStatus>, total_count: usize, cancelled: bool) -> Self {
        let summary = BatchMergeSummary {
            total_count,
            success_count: statuses
                .iter()
                .filter(|s| s.status == MergeOutcome::Success)
                .count(),
            skipped_count: statuses
                .iter()
                .filter(|s| s.status == MergeOutcome::Skipped)
                .count(),
            failed_count: statuses
                .iter()
                .filter(|s| s.status == MergeOutcome::Failed)
                .count(),
        };
        Self {
            statuses,
            summary,
            cancelled,
        }
    }
}

/// Snapshot delivered to the progress sink after each processed branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeProgress {
    pub branch: String,
    pub status: MergeOutcome,
    pub completed: usize,
    pub total: usize,
    pub success_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
}
