//! Agent-specific error types.

use crate::errors::ArborError;

/// Errors that can occur during agent operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Unknown agent '{name}'. Supported: claude, codex, gemini, opencode, qwen")]
    UnknownAgent { name: String },

    #[error("Agent '{name}' CLI is not installed or not in PATH")]
    AgentNotAvailable { name: String },
}

impl ArborError for AgentError {
    fn error_code(&self) -> &'static str {
        match self {
            AgentError::UnknownAgent { .. } => "UNKNOWN_AGENT",
            AgentError::AgentNotAvailable { .. } => "AGENT_NOT_AVAILABLE",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            AgentError::UnknownAgent { .. } | AgentError::AgentNotAvailable { .. }
        )
    }
}
