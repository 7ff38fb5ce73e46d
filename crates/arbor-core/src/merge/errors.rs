//! Batch merge error types.
//!
//! Only configuration-level preconditions are hard failures here. Merge
//! conflicts and per-branch operation failures are downgraded to status
//! fields so a batch always returns a complete report.

use crate::errors::ArborError;
use crate::git::GitError;

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("No eligible source branch found (expected 'main', 'develop', or 'master')")]
    NoSourceBranch,

    #[error("auto_push requires a remote to be configured")]
    RemoteRequired,

    #[error("Invalid batch merge configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Git operation failed: {source}")]
    Git {
        #[from]
        source: GitError,
    },
}

impl ArborError for MergeError {
    fn error_code(&self) -> &'static str {
        match self {
            MergeError::NoSourceBranch => "NO_SOURCE_BRANCH",
            MergeError::RemoteRequired => "REMOTE_REQUIRED",
            MergeError::InvalidConfig { .. } => "INVALID_MERGE_CONFIG",
            MergeError::Git { .. } => "MERGE_GIT_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            MergeError::NoSourceBranch
                | MergeError::RemoteRequired
                | MergeError::InvalidConfig { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_source_branch_display() {
        let error = MergeError::NoSourceBranch;
        assert_eq!(
            error.to_string(),
            "No eligible source branch found (expected 'main', 'develop', or 'master')"
        );
        assert_eq!(error.error_code(), "NO_SOURCE_BRANCH");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_remote_required_display() {
        let error = MergeError::RemoteRequired;
        assert_eq!(error.to_string(), "auto_push requires a remote to be configured");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_git_error_wrapping() {
        let error = MergeError::from(GitError::NotInRepository);
        assert_eq!(error.error_code(), "MERGE_GIT_ERROR");
        assert!(!error.is_user_error());
    }
}
