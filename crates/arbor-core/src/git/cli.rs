//! Centralized git CLI wrappers for merge-state and auth-requiring operations.
//!
//! Operations like `fetch`, `merge`, `push`, and `worktree add` either require
//! authentication or manipulate merge state that is simpler to drive through
//! the CLI. The git CLI inherits the user's SSH agent and credential helpers
//! automatically, while git2 requires explicit credential callback setup.
//!
//! Each function validates arguments, logs structured events, and maps errors
//! consistently.

use std::path::Path;
use std::process::{Command, Output};

use tracing::{info, warn};

use super::errors::GitError;
use super::operations::{parse_worktree_list, validate_branch_name};
use super::types::{WorktreeCreateRequest, WorktreeEntry};

/// Validate a git argument to prevent injection.
///
/// Rejects values that start with `-` (option injection), contain control
/// characters, or contain `::` sequences (refspec injection).
pub fn validate_git_arg(value: &str, label: &str) -> Result<(), GitError> {
    if value.starts_with('-') {
        return Err(GitError::OperationFailed {
            message: format!("Invalid {label}: '{value}' (must not start with '-')"),
        });
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(GitError::OperationFailed {
            message: format!("Invalid {label}: contains control characters"),
        });
    }
    if value.contains("::") {
        return Err(GitError::OperationFailed {
            message: format!("Invalid {label}: '::' sequences are not allowed"),
        });
    }
    Ok(())
}

fn run_git(dir: &Path, args: &[&str]) -> Result<Output, GitError> {
    Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .map_err(|e| GitError::OperationFailed {
            message: format!("Failed to execute git {}: {}", args.join(" "), e),
        })
}

/// Combine stderr and stdout into a single failure message.
///
/// git writes conflict summaries to stdout and most errors to stderr;
/// whichever is non-empty carries the useful text.
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Fetch all configured remotes once.
///
/// Uses `git fetch` CLI to inherit the user's SSH agent and credential
/// helpers with zero auth code in arbor.
pub fn fetch_all_remotes(repo_root: &Path) -> Result<(), GitError> {
    info!(event = "core.git.fetch_all_started", path = %repo_root.display());

    let output = run_git(repo_root, &["fetch", "--all", "--prune"])?;

    if output.status.success() {
        info!(event = "core.git.fetch_all_completed");
        Ok(())
    } else {
        let message = failure_message(&output);
        warn!(event = "core.git.fetch_all_failed", stderr = %message);
        Err(GitError::FetchFailed {
            remote: "all".to_string(),
            message,
        })
    }
}

/// Merge `source` into the branch checked out at `worktree_path`.
///
/// With `dry_run`, the merge is performed with `--no-commit --no-ff` so the
/// caller can inspect the outcome and roll back; nothing is committed.
///
/// # Errors
/// Returns `GitError::MergeFailed` on any non-zero exit, conflict or not.
/// Callers distinguish conflicts via [`has_merge_conflict`].
pub fn merge_from_branch(
    worktree_path: &Path,
    source_branch: &str,
    dry_run: bool,
) -> Result<(), GitError> {
    validate_git_arg(source_branch, "source branch")?;

    info!(
        event = "core.git.merge_started",
        source = source_branch,
        dry_run = dry_run,
        path = %worktree_path.display()
    );

    let args: Vec<&str> = if dry_run {
        vec!["merge", "--no-commit", "--no-ff", source_branch]
    } else {
        vec!["merge", source_branch]
    };

    let output = run_git(worktree_path, &args)?;

    if output.status.success() {
        info!(
            event = "core.git.merge_completed",
            source = source_branch,
            dry_run = dry_run
        );
        Ok(())
    } else {
        let message = failure_message(&output);
        warn!(
            event = "core.git.merge_failed",
            source = source_branch,
            dry_run = dry_run,
            path = %worktree_path.display(),
            stderr = %message
        );
        Err(GitError::MergeFailed {
            source_branch: source_branch.to_string(),
            worktree: worktree_path.display().to_string(),
            message,
        })
    }
}

/// Check whether a worktree currently has unresolved merge conflicts.
///
/// Probes `git ls-files --unmerged`; a failed probe degrades to `false`
/// with a warning so a transient error is never mistaken for a conflict.
pub fn has_merge_conflict(worktree_path: &Path) -> bool {
    match run_git(worktree_path, &["ls-files", "--unmerged"]) {
        Ok(output) if output.status.success() => !output.stdout.is_empty(),
        Ok(output) => {
            warn!(
                event = "core.git.conflict_probe_failed",
                path = %worktree_path.display(),
                exit_code = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim()
            );
            false
        }
        Err(e) => {
            warn!(
                event = "core.git.conflict_probe_error",
                path = %worktree_path.display(),
                error = %e
            );
            false
        }
    }
}

/// Abort an in-progress merge, restoring the worktree to its pre-merge state.
pub fn abort_merge(worktree_path: &Path) -> Result<(), GitError> {
    info!(event = "core.git.merge_abort_started", path = %worktree_path.display());

    let output = run_git(worktree_path, &["merge", "--abort"])?;

    if output.status.success() {
        info!(event = "core.git.merge_abort_completed", path = %worktree_path.display());
        Ok(())
    } else {
        let message = failure_message(&output);
        warn!(
            event = "core.git.merge_abort_failed",
            path = %worktree_path.display(),
            stderr = %message
        );
        Err(GitError::OperationFailed {
            message: format!("git merge --abort failed: {message}"),
        })
    }
}

/// Hard-reset a worktree to its current HEAD, discarding staged and
/// unstaged changes.
pub fn reset_to_head(worktree_path: &Path) -> Result<(), GitError> {
    info!(event = "core.git.reset_started", path = %worktree_path.display());

    let output = run_git(worktree_path, &["reset", "--hard", "HEAD"])?;

    if output.status.success() {
        info!(event = "core.git.reset_completed", path = %worktree_path.display());
        Ok(())
    } else {
        let message = failure_message(&output);
        warn!(
            event = "core.git.reset_failed",
            path = %worktree_path.display(),
            stderr = %message
        );
        Err(GitError::OperationFailed {
            message: format!("git reset --hard HEAD failed: {message}"),
        })
    }
}

/// Push a branch to a remote.
///
/// Uses the git CLI because push operations require authentication that the
/// CLI inherits from the user's credential helpers.
pub fn push_branch(worktree_path: &Path, branch: &str, remote: &str) -> Result<(), GitError> {
    validate_git_arg(remote, "remote name")?;
    validate_git_arg(branch, "branch name")?;

    info!(
        event = "core.git.push_started",
        remote = remote,
        branch = branch,
        path = %worktree_path.display()
    );

    let output = run_git(worktree_path, &["push", remote, branch])?;

    if output.status.success() {
        info!(
            event = "core.git.push_completed",
            remote = remote,
            branch = branch
        );
        Ok(())
    } else {
        let message = failure_message(&output);
        warn!(
            event = "core.git.push_failed",
            remote = remote,
            branch = branch,
            stderr = %message
        );
        Err(GitError::PushFailed {
            branch: branch.to_string(),
            remote: remote.to_string(),
            message,
        })
    }
}

/// List the repository's registered worktrees.
pub fn list_worktrees(repo_root: &Path) -> Result<Vec<WorktreeEntry>, GitError> {
    let output = run_git(repo_root, &["worktree", "list", "--porcelain"])?;

    if !output.status.success() {
        let message = failure_message(&output);
        return Err(GitError::OperationFailed {
            message: format!("git worktree list failed: {message}"),
        });
    }

    Ok(parse_worktree_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Create a worktree per the request.
///
/// For an existing branch (`is_new_branch = false`) the branch is checked
/// out directly; for a new branch it is created at `base_branch` (or HEAD)
/// as part of the add.
pub fn create_worktree(request: &WorktreeCreateRequest) -> Result<(), GitError> {
    let branch = validate_branch_name(&request.branch)?;
    if let Some(base) = &request.base_branch {
        validate_git_arg(base, "base branch")?;
    }

    info!(
        event = "core.git.worktree_create_started",
        branch = branch,
        path = %request.path.display(),
        is_new_branch = request.is_new_branch
    );

    if request.path.exists() {
        return Err(GitError::WorktreeAlreadyExists {
            path: request.path.display().to_string(),
        });
    }

    if let Some(parent) = request.path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GitError::IoError { source: e })?;
    }

    let path_str = request.path.display().to_string();
    let mut args: Vec<&str> = vec!["worktree", "add"];
    if request.is_new_branch {
        args.extend(["-b", branch.as_str(), path_str.as_str()]);
        if let Some(base) = &request.base_branch {
            args.push(base.as_str());
        }
    } else {
        args.extend([path_str.as_str(), branch.as_str()]);
    }

    let output = run_git(&request.repo_root, &args)?;

    if output.status.success() {
        info!(
            event = "core.git.worktree_create_completed",
            branch = branch,
            path = %request.path.display()
        );
        Ok(())
    } else {
        let message = failure_message(&output);
        warn!(
            event = "core.git.worktree_create_failed",
            branch = branch,
            path = %request.path.display(),
            stderr = %message
        );
        Err(GitError::OperationFailed {
            message: format!("git worktree add failed: {message}"),
        })
    }
}

/// Remove a registered worktree.
pub fn remove_worktree(repo_root: &Path, worktree_path: &Path, force: bool) -> Result<(), GitError> {
    info!(
        event = "core.git.worktree_remove_started",
        path = %worktree_path.display(),
        force = force
    );

    let path_str = worktree_path.display().to_string();
    let mut args: Vec<&str> = vec!["worktree", "remove"];
    if force {
        args.push("--force");
    }
    args.push(&path_str);

    let output = run_git(repo_root, &args)?;

    if output.status.success() {
        info!(event = "core.git.worktree_remove_completed", path = %worktree_path.display());
        Ok(())
    } else {
        let message = failure_message(&output);
        if message.contains("is not a working tree") {
            return Err(GitError::WorktreeNotFound {
                path: path_str,
            });
        }
        warn!(
            event = "core.git.worktree_remove_failed",
            path = %worktree_path.display(),
            stderr = %message
        );
        Err(GitError::WorktreeRemovalFailed {
            path: path_str,
            message,
        })
    }
}
