//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.arbor/config.toml` (global user preferences)
//! 3. **Project config** - `./.arbor/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)

use std::fs;
use std::path::PathBuf;

use crate::agents;
use crate::config::types::ArborConfig;
use crate::config::validation::validate_config;

/// Check if an error is a "file not found" error.
fn is_file_not_found(e: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(io_err) = e.downcast_ref::<std::io::Error>() {
        return io_err.kind() == std::io::ErrorKind::NotFound;
    }

    let err_str = e.to_string();
    err_str.contains("No such file or directory") || err_str.contains("cannot find the path")
}

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a present file fails to parse or the merged result
/// fails validation. Missing config files are not errors.
pub fn load_hierarchy() -> Result<ArborConfig, Box<dyn std::error::Error>> {
    let mut config = ArborConfig::default();

    // Load user config (file not found is expected, parse errors fail)
    match load_user_config() {
        Ok(user_config) => config = merge_configs(config, user_config),
        Err(e) if !is_file_not_found(e.as_ref()) => return Err(e),
        Err(_) => {} // File not found - continue with defaults
    }

    // Load project config (file not found is expected, parse errors fail)
    match load_project_config() {
        Ok(project_config) => config = merge_configs(config, project_config),
        Err(e) if !is_file_not_found(e.as_ref()) => return Err(e),
        Err(_) => {} // File not found - continue with merged config
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load the user configuration from ~/.arbor/config.toml.
fn load_user_config() -> Result<ArborConfig, Box<dyn std::error::Error>> {
    let home_dir = dirs::home_dir().ok_or("Could not find home directory")?;
    let config_path = home_dir.join(".arbor").join("config.toml");
    load_config_file(&config_path)
}

/// Load the project configuration from ./.arbor/config.toml.
fn load_project_config() -> Result<ArborConfig, Box<dyn std::error::Error>> {
    let config_path = std::env::current_dir()?.join(".arbor").join("config.toml");
    load_config_file(&config_path)
}

/// Load a configuration file from the given path.
pub(crate) fn load_config_file(path: &PathBuf) -> Result<ArborConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path).map_err(|e| -> Box<dyn std::error::Error> {
        if e.kind() == std::io::ErrorKind::NotFound {
            Box::new(e)
        } else {
            format!("Failed to read config file '{}': {}", path.display(), e).into()
        }
    })?;
    let config: ArborConfig = toml::from_str(&content)
        .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;
    Ok(config)
}

/// Merge two configurations, with `overlay` values taking precedence.
pub(crate) fn merge_configs(base: ArborConfig, overlay: ArborConfig) -> ArborConfig {
    let mut merged = base;

    if overlay.agent.default.is_some() {
        merged.agent.default = overlay.agent.default;
    }
    merged.agents.extend(overlay.agents);

    if overlay.resolver.window_ms.is_some() {
        merged.resolver.window_ms = overlay.resolver.window_ms;
    }
    if overlay.resolver.poll_interval_ms.is_some() {
        merged.resolver.poll_interval_ms = overlay.resolver.poll_interval_ms;
    }
    if overlay.resolver.timeout_ms.is_some() {
        merged.resolver.timeout_ms = overlay.resolver.timeout_ms;
    }

    if overlay.merge.remote.is_some() {
        merged.merge.remote = overlay.merge.remote;
    }
    if overlay.merge.auto_push.is_some() {
        merged.merge.auto_push = overlay.merge.auto_push;
    }

    merged
}

/// Get the command to run for an agent.
///
/// A `[agents.<name>]` entry overrides the built-in command, which also
/// makes user-defined custom agents launchable.
pub fn get_agent_command(
    config: &ArborConfig,
    agent_name: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(custom) = config.agents.get(agent_name) {
        return Ok(custom.command.clone());
    }
    if let Some(command) = agents::get_default_command(agent_name) {
        return Ok(command.to_string());
    }
    Err(format!(
        "Unknown agent '{}'. Built-in agents: {}; define others under [agents.<name>]",
        agent_name,
        agents::valid_agent_names().join(", ")
    )
    .into())
}

/// The effective default agent name.
pub fn default_agent(config: &ArborConfig) -> String {
    config
        .agent
        .default
        .clone()
        .unwrap_or_else(|| agents::default_agent_name().to_string())
}
