//! Gemini CLI agent backend implementation.

use crate::agents::traits::AgentBackend;

/// Backend implementation for Gemini CLI.
pub struct GeminiBackend;

impl AgentBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn display_name(&self) -> &'static str {
        "Gemini CLI"
    }

    fn is_available(&self) -> bool {
        which::which("gemini").is_ok()
    }

    fn default_command(&self) -> &'static str {
        "gemini"
    }
}
