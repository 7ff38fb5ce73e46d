//! Qwen Code agent backend implementation.

use crate::agents::traits::AgentBackend;

/// Backend implementation for Qwen Code.
pub struct QwenBackend;

impl AgentBackend for QwenBackend {
    fn name(&self) -> &'static str {
        "qwen"
    }

    fn display_name(&self) -> &'static str {
        "Qwen Code"
    }

    fn is_available(&self) -> bool {
        which::which("qwen").is_ok()
    }

    fn default_command(&self) -> &'static str {
        "qwen"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qwen_backend_name() {
        let backend = QwenBackend;
        assert_eq!(backend.name(), "qwen");
    }

    #[test]
    fn test_qwen_backend_display_name() {
        let backend = QwenBackend;
        assert_eq!(backend.display_name(), "Qwen Code");
    }
}
