use crate::errors::ArborError;

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Not in a git repository")]
    NotInRepository,

    #[error("Branch '{branch}' not found")]
    BranchNotFound { branch: String },

    #[error("Worktree already exists at path: {path}")]
    WorktreeAlreadyExists { path: String },

    #[error("Worktree not found at path: {path}")]
    WorktreeNotFound { path: String },

    #[error("Failed to remove worktree at {path}: {message}")]
    WorktreeRemovalFailed { path: String, message: String },

    #[error("Fetch from '{remote}' failed: {message}")]
    FetchFailed { remote: String, message: String },

    #[error("Merge of '{source_branch}' failed in {worktree}: {message}")]
    MergeFailed {
        source_branch: String,
        worktree: String,
        message: String,
    },

    #[error("Push of '{branch}' to '{remote}' failed: {message}")]
    PushFailed {
        branch: String,
        remote: String,
        message: String,
    },

    #[error("Git operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Git2 library error: {source}")]
    Git2Error {
        #[from]
        source: git2::Error,
    },

    #[error("IO error during git operation: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl ArborError for GitError {
    fn error_code(&self) -> &'static str {
        match self {
            GitError::NotInRepository => "NOT_IN_REPOSITORY",
            GitError::BranchNotFound { .. } => "BRANCH_NOT_FOUND",
            GitError::WorktreeAlreadyExists { .. } => "WORKTREE_ALREADY_EXISTS",
            GitError::WorktreeNotFound { .. } => "WORKTREE_NOT_FOUND",
            GitError::WorktreeRemovalFailed { .. } => "WORKTREE_REMOVAL_FAILED",
            GitError::FetchFailed { .. } => "GIT_FETCH_FAILED",
            GitError::MergeFailed { .. } => "GIT_MERGE_FAILED",
            GitError::PushFailed { .. } => "GIT_PUSH_FAILED",
            GitError::OperationFailed { .. } => "GIT_OPERATION_FAILED",
            GitError::Git2Error { .. } => "GIT2_ERROR",
            GitError::IoError { .. } => "GIT_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            GitError::NotInRepository
                | GitError::BranchNotFound { .. }
                | GitError::WorktreeAlreadyExists { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_error_display() {
        let error = GitError::NotInRepository;
        assert_eq!(error.to_string(), "Not in a git repository");
        assert_eq!(error.error_code(), "NOT_IN_REPOSITORY");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_branch_not_found() {
        let error = GitError::BranchNotFound {
            branch: "missing".to_string(),
        };
        assert_eq!(error.to_string(), "Branch 'missing' not found");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_merge_failed_display() {
        let error = GitError::MergeFailed {
            source_branch: "main".to_string(),
            worktree: "/tmp/wt".to_string(),
            message: "CONFLICT (content)".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Merge of 'main' failed in /tmp/wt: CONFLICT (content)"
        );
        assert_eq!(error.error_code(), "GIT_MERGE_FAILED");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_push_failed_display() {
        let error = GitError::PushFailed {
            branch: "feature/a".to_string(),
            remote: "origin".to_string(),
            message: "auth".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Push of 'feature/a' to 'origin' failed: auth"
        );
        assert_eq!(error.error_code(), "GIT_PUSH_FAILED");
    }
}
