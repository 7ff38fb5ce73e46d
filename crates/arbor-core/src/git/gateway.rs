//! Gateway trait over the git/worktree primitives.
//!
//! The merge orchestrator and the session resolver's branch-to-worktree
//! resolution consume git through this narrow seam so tests can substitute
//! a recording mock for the real repository.

use std::path::{Path, PathBuf};

use super::errors::GitError;
use super::types::{BranchEntry, WorktreeCreateRequest, WorktreeEntry};
use super::{cli, operations};

/// Narrow interface over the git/worktree primitives consumed by the core
/// subsystems.
pub trait GitGateway {
    fn list_local_branches(&self) -> Result<Vec<BranchEntry>, GitError>;
    fn list_worktrees(&self) -> Result<Vec<WorktreeEntry>, GitError>;
    fn create_worktree(&self, request: &WorktreeCreateRequest) -> Result<(), GitError>;
    fn remove_worktree(&self, path: &Path, force: bool) -> Result<(), GitError>;

    fn merge_from_branch(
        &self,
        worktree_path: &Path,
        source_branch: &str,
        dry_run: bool,
    ) -> Result<(), GitError>;
    fn has_merge_conflict(&self, worktree_path: &Path) -> bool;
    fn abort_merge(&self, worktree_path: &Path) -> Result<(), GitError>;
    fn reset_to_head(&self, worktree_path: &Path) -> Result<(), GitError>;

    fn fetch_all_remotes(&self) -> Result<(), GitError>;
    fn current_branch_name(&self, worktree_path: &Path) -> Result<String, GitError>;
    fn push_branch(
        &self,
        worktree_path: &Path,
        branch: &str,
        remote: &str,
    ) -> Result<(), GitError>;

    fn repository_root(&self) -> Result<PathBuf, GitError>;
    fn worktree_path_for(&self, repo_root: &Path, branch: &str) -> PathBuf;
}

/// Real [`GitGateway`] bound to a repository on disk.
///
/// Read operations go through git2; merge-state and auth-requiring
/// operations shell out to the git CLI (see [`cli`]).
#[derive(Debug)]
pub struct SystemGit {
    repo_root: PathBuf,
}

impl SystemGit {
    /// Bind a gateway to an explicit repository root.
    pub fn new(repo_root: PathBuf) -> Self {
        Self { repo_root }
    }

    /// Discover the repository containing `start` and bind to it.
    pub fn discover(start: &Path) -> Result<Self, GitError> {
        let repo_root = operations::repository_root(start)?;
        Ok(Self { repo_root })
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }
}

impl GitGateway for SystemGit {
    fn list_local_branches(&self) -> Result<Vec<BranchEntry>, GitError> {
        operations::list_local_branches(&self.repo_root)
    }

    fn list_worktrees(&self) -> Result<Vec<WorktreeEntry>, GitError> {
        cli::list_worktrees(&self.repo_root)
    }

    fn create_worktree(&self, request: &WorktreeCreateRequest) -> Result<(), GitError> {
        cli::create_worktree(request)
    }

    fn remove_worktree(&self, path: &Path, force: bool) -> Result<(), GitError> {
        cli::remove_worktree(&self.repo_root, path, force)
    }

    fn merge_from_branch(
        &self,
        worktree_path: &Path,
        source_branch: &str,
        dry_run: bool,
    ) -> Result<(), GitError> {
        cli::merge_from_branch(worktree_path, source_branch, dry_run)
    }

    fn has_merge_conflict(&self, worktree_path: &Path) -> bool {
        cli::has_merge_conflict(worktree_path)
    }

    fn abort_merge(&self, worktree_path: &Path) -> Result<(), GitError> {
        cli::abort_merge(worktree_path)
    }

    fn reset_to_head(&self, worktree_path: &Path) -> Result<(), GitError> {
        cli::reset_to_head(worktree_path)
    }

    fn fetch_all_remotes(&self) -> Result<(), GitError> {
        cli::fetch_all_remotes(&self.repo_root)
    }

    fn current_branch_name(&self, worktree_path: &Path) -> Result<String, GitError> {
        operations::current_branch(worktree_path)?.ok_or_else(|| GitError::OperationFailed {
            message: format!(
                "Worktree at {} is in detached HEAD state",
                worktree_path.display()
            ),
        })
    }

    fn push_branch(
        &self,
        worktree_path: &Path,
        branch: &str,
        remote: &str,
    ) -> Result<(), GitError> {
        cli::push_branch(worktree_path, branch, remote)
    }

    fn repository_root(&self) -> Result<PathBuf, GitError> {
        Ok(self.repo_root.clone())
    }

    fn worktree_path_for(&self, repo_root: &Path, branch: &str) -> PathBuf {
        operations::worktree_path_for(repo_root, branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn init_repo(path: &Path) {
        git(path, &["init"]);
        git(path, &["config", "user.email", "test@test.com"]);
        git(path, &["config", "user.name", "Test User"]);
        git(path, &["commit", "--allow-empty", "-m", "initial"]);
        git(path, &["branch", "-M", "main"]);
    }

    #[test]
    fn test_discover_binds_to_repo_root() {
        let temp = TempDir::new().unwrap();
        init_repo(temp.path());
        let subdir = temp.path().join("nested");
        std::fs::create_dir(&subdir).unwrap();

        let gateway = SystemGit::discover(&subdir).unwrap();
        assert_eq!(
            gateway.repo_root().canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_discover_outside_repo_fails() {
        let temp = TempDir::new().unwrap();
        let result = SystemGit::discover(temp.path());
        assert!(matches!(result.unwrap_err(), GitError::NotInRepository));
    }

    #[test]
    fn test_gateway_lists_branches_and_worktrees() {
        let temp = TempDir::new().unwrap();
        init_repo(temp.path());
        git(temp.path(), &["branch", "feature/a"]);

        let gateway = SystemGit::new(temp.path().to_path_buf());
        let branches = gateway.list_local_branches().unwrap();
        assert_eq!(branches.len(), 2);

        let worktrees = gateway.list_worktrees().unwrap();
        assert_eq!(worktrees.len(), 1);
        assert_eq!(worktrees[0].branch, Some("main".to_string()));
    }

    #[test]
    fn test_gateway_current_branch_name() {
        let temp = TempDir::new().unwrap();
        init_repo(temp.path());

        let gateway = SystemGit::new(temp.path().to_path_buf());
        assert_eq!(gateway.current_branch_name(temp.path()).unwrap(), "main");
    }
}
