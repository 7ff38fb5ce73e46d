use std::path::{Path, PathBuf};

use git2::{BranchType, Repository};
use tracing::debug;

use crate::git::errors::GitError;
use crate::git::types::{BranchEntry, WorktreeEntry};

/// Sanitize a string for safe use in filesystem paths.
///
/// Replaces `/` with `-` to prevent nested directory creation. Git branch
/// names like `feature/foo` are valid, but a worktree directory derived from
/// one must stay flat.
pub fn sanitize_for_path(s: &str) -> String {
    s.replace('/', "-")
}

pub fn validate_branch_name(branch: &str) -> Result<String, GitError> {
    let trimmed = branch.trim();

    if trimmed.is_empty() {
        return Err(GitError::OperationFailed {
            message: "Branch name cannot be empty".to_string(),
        });
    }

    // Git branch name validation rules
    if trimmed.contains("..")
        || trimmed.starts_with('-')
        || trimmed.contains(' ')
        || trimmed.contains('\t')
        || trimmed.contains('\n')
    {
        return Err(GitError::OperationFailed {
            message: format!("Invalid branch name: '{}'", trimmed),
        });
    }

    Ok(trimmed.to_string())
}

/// Resolve the repository working-tree root for any path inside it.
///
/// Walks up the directory tree via `Repository::discover`.
///
/// # Errors
/// Returns `GitError::NotInRepository` if the path is not within a git
/// repository, or `GitError::OperationFailed` for a bare repository.
pub fn repository_root(start: &Path) -> Result<PathBuf, GitError> {
    let repo = Repository::discover(start).map_err(|e| {
        debug!(
            event = "core.git.discover_failed",
            path = %start.display(),
            error = %e,
            "Repository discovery failed - path may not be in a git repository"
        );
        GitError::NotInRepository
    })?;

    let workdir = repo.workdir().ok_or_else(|| GitError::OperationFailed {
        message: "Repository has no working directory".to_string(),
    })?;

    Ok(workdir.to_path_buf())
}

/// List local branches with their classification, in discovery order.
pub fn list_local_branches(repo_root: &Path) -> Result<Vec<BranchEntry>, GitError> {
    let repo = Repository::open(repo_root).map_err(|e| GitError::Git2Error { source: e })?;

    let branches = repo
        .branches(Some(BranchType::Local))
        .map_err(|e| GitError::Git2Error { source: e })?;

    let mut entries = Vec::new();
    for branch in branches.flatten() {
        let (branch, _) = branch;
        if let Ok(Some(name)) = branch.name() {
            entries.push(BranchEntry::new(name));
        }
    }

    debug!(
        event = "core.git.branches_listed",
        count = entries.len(),
        repo = %repo_root.display()
    );

    Ok(entries)
}

/// Check whether a local branch exists.
pub fn branch_exists(repo_root: &Path, branch: &str) -> Result<bool, GitError> {
    let repo = Repository::open(repo_root).map_err(|e| GitError::Git2Error { source: e })?;
    match repo.find_branch(branch, BranchType::Local) {
        Ok(_) => Ok(true),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
        Err(e) => Err(GitError::Git2Error { source: e }),
    }
}

/// Gets the current branch name for a worktree path.
///
/// Returns `None` if the worktree is in a detached HEAD state.
///
/// # Errors
/// Returns `GitError::Git2Error` if the repository HEAD cannot be accessed.
pub fn current_branch(worktree_path: &Path) -> Result<Option<String>, GitError> {
    let repo = Repository::open(worktree_path).map_err(|e| GitError::Git2Error { source: e })?;
    let head = repo.head().map_err(|e| GitError::Git2Error { source: e })?;

    if let Some(branch_name) = head.shorthand() {
        Ok(Some(branch_name.to_string()))
    } else {
        debug!(
            event = "core.git.detached_head",
            path = %worktree_path.display(),
            "Worktree is in detached HEAD state, no current branch available"
        );
        Ok(None)
    }
}

/// Compute the deterministic worktree path for a branch.
///
/// Worktrees live in a sibling directory of the repository named
/// `<repo-name>-worktrees`, one flat entry per branch:
///
/// `/work/myrepo` + `feature/auth` -> `/work/myrepo-worktrees/feature-auth`
pub fn worktree_path_for(repo_root: &Path, branch: &str) -> PathBuf {
    let repo_name = repo_root
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("repo");
    let safe_branch = sanitize_for_path(branch);

    match repo_root.parent() {
        Some(parent) => parent
            .join(format!("{repo_name}-worktrees"))
            .join(safe_branch),
        None => repo_root.join(".worktrees").join(safe_branch),
    }
}

/// Parse `git worktree list --porcelain` output into entries.
///
/// Each stanza starts with a `worktree <path>` line; a `branch
/// refs/heads/<name>` line carries the checkout, `detached` stanzas have
/// none. Unknown attribute lines are ignored.
pub fn parse_worktree_list(output: &str) -> Vec<WorktreeEntry> {
    let mut entries = Vec::new();
    let mut current_path: Option<PathBuf> = None;
    let mut current_branch: Option<String> = None;

    let mut flush = |path: &mut Option<PathBuf>, branch: &mut Option<String>| {
        if let Some(p) = path.take() {
            entries.push(WorktreeEntry {
                path: p,
                branch: branch.take(),
            });
        } else {
            *branch = None;
        }
    };

    for line in output.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            flush(&mut current_path, &mut current_branch);
        } else if let Some(path) = line.strip_prefix("worktree ") {
            // A new stanza without a preceding blank line still terminates
            // the previous one.
            flush(&mut current_path, &mut current_branch);
            current_path = Some(PathBuf::from(path));
        } else if let Some(branch_ref) = line.strip_prefix("branch ") {
            let name = branch_ref
                .strip_prefix("refs/heads/")
                .unwrap_or(branch_ref);
            current_branch = Some(name.to_string());
        }
    }
    flush(&mut current_path, &mut current_branch);

    entries
}
