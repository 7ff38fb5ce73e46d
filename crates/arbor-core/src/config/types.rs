//! Configuration type definitions.
//!
//! These types are serialized/deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [agent]
//! default = "claude"
//!
//! [agents.goose]
//! command = "goose session"
//! display_name = "Goose"
//!
//! [resolver]
//! window_ms = 1800000
//! poll_interval_ms = 2000
//! timeout_ms = 120000
//!
//! [merge]
//! remote = "origin"
//! auto_push = false
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sessions::types::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS, DEFAULT_WINDOW_MS,
};

/// Main configuration loaded from TOML config files.
///
/// Loaded from `~/.arbor/config.toml` (user) and `./.arbor/config.toml`
/// (project); project values override user values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ArborConfig {
    /// Global agent configuration
    #[serde(default)]
    pub agent: AgentSection,

    /// User-defined agents, and command overrides for built-in ones
    #[serde(default)]
    pub agents: HashMap<String, CustomAgent>,

    /// Session resolver tunables
    #[serde(default)]
    pub resolver: ResolverSection,

    /// Batch merge defaults
    #[serde(default)]
    pub merge: MergeSection,
}

/// Global agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AgentSection {
    /// Default agent to use when none is specified. A built-in agent name
    /// or a key of `[agents.<name>]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A user-defined agent, or a command override for a built-in one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomAgent {
    /// Command used to launch the agent in a worktree.
    pub command: String,

    /// Display name for listings; defaults to the config key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Session resolver tunables.
///
/// All values are optional; accessors fall back to the documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResolverSection {
    /// Ranking window around a preferred timestamp, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_ms: Option<i64>,

    /// Poll interval for session waits, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,

    /// Overall timeout for session waits, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ResolverSection {
    pub fn effective_window_ms(&self) -> i64 {
        self.window_ms.unwrap_or(DEFAULT_WINDOW_MS)
    }

    pub fn effective_poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS)
    }

    pub fn effective_timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_WAIT_TIMEOUT_MS)
    }
}

/// Batch merge defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MergeSection {
    /// Default remote for auto-push.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,

    /// Push merged branches by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_push: Option<bool>,
}
