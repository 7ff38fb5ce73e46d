//! Batch merge orchestrator.
//!
//! Merges a chosen source branch into every other eligible local branch's
//! worktree, sequentially. Worktrees share repository-level state (refs,
//! index locks), so the per-branch loop is the concurrency control; it is
//! also the cancellation point, checked once per iteration.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::git::GitGateway;
use crate::git::types::{BranchKind, WorktreeCreateRequest};
use crate::merge::errors::MergeError;
use crate::merge::progress::ProgressSink;
use crate::merge::types::{
    BatchMergeConfig, BatchMergeResult, BranchMergeStatus, MergeOutcome, MergeProgress, PushStatus,
};

pub struct BatchMergeOrchestrator<G: GitGateway> {
    git: G,
}

impl<G: GitGateway> BatchMergeOrchestrator<G> {
    pub fn new(git: G) -> Self {
        Self { git }
    }

    pub fn git(&self) -> &G {
        &self.git
    }

    /// Pick the source branch: classified `main`, else `develop`, else the
    /// literal name `master`.
    ///
    /// # Errors
    /// `MergeError::NoSourceBranch` when none of the three exist.
    pub fn determine_source_branch(&self) -> Result<String, MergeError> {
        let branches = self.git.list_local_branches()?;

        for kind in [BranchKind::Main, BranchKind::Develop] {
            if let Some(entry) = branches.iter().find(|b| b.kind == kind) {
                return Ok(entry.name.clone());
            }
        }
        if let Some(entry) = branches.iter().find(|b| b.name == "master") {
            return Ok(entry.name.clone());
        }

        Err(MergeError::NoSourceBranch)
    }

    /// All local branches outside the source family, in discovery order.
    ///
    /// Excludes exactly the branches classified `main`/`develop` and the
    /// literal name `master`. The current branch is a valid target.
    pub fn target_branches(&self) -> Result<Vec<String>, MergeError> {
        let branches = self.git.list_local_branches()?;
        Ok(branches
            .into_iter()
            .filter(|b| !matches!(b.kind, BranchKind::Main | BranchKind::Develop))
            .filter(|b| b.name != "master")
            .map(|b| b.name)
            .collect())
    }

    /// Locate or create the worktree for an existing branch.
    ///
    /// Returns the worktree path and whether it was created by this call.
    /// Idempotent: an existing worktree tracking the branch is reused.
    pub fn ensure_worktree(&self, branch: &str) -> Result<(PathBuf, bool), MergeError> {
        let worktrees = self.git.list_worktrees()?;
        if let Some(existing) = worktrees
            .iter()
            .find(|w| w.branch.as_deref() == Some(branch))
        {
            return Ok((existing.path.clone(), false));
        }

        let repo_root = self.git.repository_root()?;
        let path = self.git.worktree_path_for(&repo_root, branch);

        info!(
            event = "core.merge.worktree_create_started",
            branch = branch,
            path = %path.display()
        );

        self.git.create_worktree(&WorktreeCreateRequest {
            repo_root,
            path: path.clone(),
            branch: branch.to_string(),
            is_new_branch: false,
            base_branch: None,
        })?;

        Ok((path, true))
    }

    /// Merge `source` into `branch`'s worktree, ensuring the worktree first.
    pub fn merge_branch(
        &self,
        branch: &str,
        source: &str,
        config: &BatchMergeConfig,
    ) -> BranchMergeStatus {
        match self.ensure_worktree(branch) {
            Ok((path, created)) => {
                let mut status = self.merge_branch_at(branch, source, &path, config);
                status.worktree_created = created;
                status
            }
            Err(e) => {
                warn!(
                    event = "core.merge.worktree_ensure_failed",
                    branch = branch,
                    error = %e
                );
                BranchMergeStatus {
                    branch_name: branch.to_string(),
                    status: MergeOutcome::Failed,
                    worktree_created: false,
                    push_status: PushStatus::NotExecuted,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// The per-branch merge state machine, against a known worktree path.
    ///
    /// - merge success + dry run: roll back with exactly one reset-to-head
    /// - merge success + auto-push (non-dry): push, recording `push_status`
    ///   without ever demoting `status` from success
    /// - merge failure + conflict detected: `skipped`, with exactly one
    ///   abort-merge to leave the worktree clean
    /// - merge failure without conflict: `failed`, no rollback (no merge
    ///   state was entered)
    fn merge_branch_at(
        &self,
        branch: &str,
        source: &str,
        worktree_path: &Path,
        config: &BatchMergeConfig,
    ) -> BranchMergeStatus {
        let mut status = BranchMergeStatus {
            branch_name: branch.to_string(),
            status: MergeOutcome::Success,
            worktree_created: false,
            push_status: PushStatus::NotExecuted,
            error: None,
        };

        match self
            .git
            .merge_from_branch(worktree_path, source, config.dry_run)
        {
            Ok(()) => {
                info!(
                    event = "core.merge.branch_merged",
                    branch = branch,
                    source = source,
                    dry_run = config.dry_run
                );

                if config.dry_run {
                    if let Err(e) = self.git.reset_to_head(worktree_path) {
                        warn!(
                            event = "core.merge.dry_run_rollback_failed",
                            branch = branch,
                            error = %e
                        );
                        status.error = Some(format!("dry-run rollback failed: {e}"));
                    }
                } else if config.auto_push {
                    status.push_status = self.push_merged_branch(worktree_path, config);
                    if status.push_status == PushStatus::Failed && status.error.is_none() {
                        status.error = Some("push failed after successful merge".to_string());
                    }
                }
            }
            Err(merge_err) => {
                if self.git.has_merge_conflict(worktree_path) {
                    info!(
                        event = "core.merge.branch_conflict_skipped",
                        branch = branch,
                        source = source
                    );
                    status.status = MergeOutcome::Skipped;
                    if let Err(e) = self.git.abort_merge(worktree_path) {
                        warn!(
                            event = "core.merge.conflict_abort_failed",
                            branch = branch,
                            error = %e
                        );
                        status.error = Some(format!("conflict abort failed: {e}"));
                    }
                } else {
                    warn!(
                        event = "core.merge.branch_failed",
                        branch = branch,
                        source = source,
                        error = %merge_err
                    );
                    status.status = MergeOutcome::Failed;
                    status.error = Some(merge_err.to_string());
                }
            }
        }

        status
    }

    /// Push the worktree's current branch after a successful merge.
    ///
    /// Failures are recorded as `PushStatus::Failed`; the merge outcome is
    /// already decided and never demoted.
    fn push_merged_branch(&self, worktree_path: &Path, config: &BatchMergeConfig) -> PushStatus {
        let Some(remote) = config.remote.as_deref() else {
            // validate() rejects this configuration before a run starts
            return PushStatus::Failed;
        };

        let branch_name = match self.git.current_branch_name(worktree_path) {
            Ok(name) => name,
            Err(e) => {
                warn!(
                    event = "core.merge.push_branch_resolve_failed",
                    path = %worktree_path.display(),
                    error = %e
                );
                return PushStatus::Failed;
            }
        };

        match self.git.push_branch(worktree_path, &branch_name, remote) {
            Ok(()) => PushStatus::Success,
            Err(e) => {
                warn!(
                    event = "core.merge.push_failed",
                    branch = branch_name.as_str(),
                    remote = remote,
                    error = %e
                );
                PushStatus::Failed
            }
        }
    }

    /// Run the whole batch: preflight fetch, then one sequential pass over
    /// the target branches with a progress snapshot per branch and a
    /// cooperative cancellation check between branches.
    ///
    /// A fetch failure is logged and the batch proceeds on stale refs.
    /// Already-completed merges are never rolled back by cancellation.
    pub fn execute_batch_merge(
        &self,
        config: &BatchMergeConfig,
        sink: &mut dyn ProgressSink,
        cancel: &AtomicBool,
    ) -> Result<BatchMergeResult, MergeError> {
        config.validate()?;

        info!(
            event = "core.merge.batch_started",
            source = config.source_branch.as_str(),
            targets = config.target_branches.len(),
            dry_run = config.dry_run,
            auto_push = config.auto_push
        );

        if let Err(e) = self.git.fetch_all_remotes() {
            warn!(
                event = "core.merge.preflight_fetch_failed",
                error = %e,
                "Continuing batch on possibly stale refs"
            );
        }

        let total = config.target_branches.len();
        let mut statuses: Vec<BranchMergeStatus> = Vec::with_capacity(total);
        let mut cancelled = false;

        for branch in &config.target_branches {
            if cancel.load(Ordering::SeqCst) {
                info!(
                    event = "core.merge.batch_cancelled",
                    completed = statuses.len(),
                    total = total
                );
                cancelled = true;
                break;
            }

            let status = self.merge_branch(branch, &config.source_branch, config);
            statuses.push(status.clone());

            sink.send(MergeProgress {
                branch: branch.clone(),
                status: status.status,
                completed: statuses.len(),
                total,
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
            });
        }

        let result = BatchMergeResult::new(statuses, total, cancelled);

        info!(
            event = "core.merge.batch_completed",
            total = result.summary.total_count,
            success = result.summary.success_count,
            skipped = result.summary.skipped_count,
            failed = result.summary.failed_count,
            cancelled = result.cancelled
        );

        Ok(result)
    }
}

/// Convenience for callers that never cancel.
pub fn never_cancelled() -> AtomicBool {
    AtomicBool::new(false)
}
