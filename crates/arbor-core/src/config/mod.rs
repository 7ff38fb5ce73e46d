//! # Configuration System
//!
//! Hierarchical TOML configuration.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.arbor/config.toml` (global user preferences)
//! 3. **Project config** - `./.arbor/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.arbor/config.toml
//! [agent]
//! default = "claude"
//!
//! [agents.goose]
//! command = "goose session"
//!
//! [resolver]
//! window_ms = 1800000
//!
//! [merge]
//! remote = "origin"
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use arbor_core::config::ArborConfig;
//!
//! // Handle config errors explicitly - don't silently fall back to defaults
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ArborConfig::load_hierarchy()?;
//!     let agent_command = config.get_agent_command("claude")?;
//!     Ok(())
//! }
//! ```

pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use types::{AgentSection, ArborConfig, CustomAgent, MergeSection, ResolverSection};
pub use validation::validate_config;

impl ArborConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, Box<dyn std::error::Error>> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }

    /// Get the command to run for a specific agent.
    ///
    /// See [`loading::get_agent_command`] for details.
    pub fn get_agent_command(
        &self,
        agent_name: &str,
    ) -> Result<String, Box<dyn std::error::Error>> {
        loading::get_agent_command(self, agent_name)
    }

    /// The effective default agent name.
    ///
    /// See [`loading::default_agent`] for details.
    pub fn default_agent(&self) -> String {
        loading::default_agent(self)
    }
}
