//! Agent type definitions.

use serde::{Deserialize, Serialize};

/// Supported agent tools in arbor.
///
/// Each variant represents a known AI coding assistant whose sessions can be
/// bound to a worktree and resolved from its on-disk session store.
/// User-defined custom agents live in configuration only and have no variant
/// here, because they have no known session store layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Claude,
    Codex,
    Gemini,
    Opencode,
    Qwen,
}

impl AgentType {
    /// Get the canonical string name for this agent type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Claude => "claude",
            AgentType::Codex => "codex",
            AgentType::Gemini => "gemini",
            AgentType::Opencode => "opencode",
            AgentType::Qwen => "qwen",
        }
    }

    /// Parse an agent type from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "claude" => Some(AgentType::Claude),
            "codex" => Some(AgentType::Codex),
            "gemini" => Some(AgentType::Gemini),
            "opencode" => Some(AgentType::Opencode),
            "qwen" => Some(AgentType::Qwen),
            _ => None,
        }
    }

    /// Get all supported agent types.
    pub fn all() -> &'static [AgentType] {
        &[
            AgentType::Claude,
            AgentType::Codex,
            AgentType::Gemini,
            AgentType::Opencode,
            AgentType::Qwen,
        ]
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "Unknown agent '{}'. Supported: {}",
                s,
                AgentType::all()
                    .iter()
                    .map(|a| a.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}
