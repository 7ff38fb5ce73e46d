//! Configuration validation.

use crate::agents;
use crate::config::types::ArborConfig;
use crate::errors::ConfigError;

/// Validate a merged configuration.
///
/// # Errors
///
/// - `InvalidAgent` when the default agent is neither built-in nor defined
///   under `[agents.<name>]`
/// - `InvalidConfiguration` for empty custom agent commands or
///   non-positive resolver tunables
pub fn validate_config(config: &ArborConfig) -> Result<(), ConfigError> {
    if let Some(default) = &config.agent.default
        && !agents::is_valid_agent(default)
        && !config.agents.contains_key(default)
    {
        return Err(ConfigError::InvalidAgent {
            agent: default.clone(),
        });
    }

    for (name, custom) in &config.agents {
        if custom.command.trim().is_empty() {
            return Err(ConfigError::InvalidConfiguration {
                message: format!("agents.{name}.command must not be empty"),
            });
        }
    }

    if let Some(window_ms) = config.resolver.window_ms
        && window_ms <= 0
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("resolver.window_ms must be positive, got {window_ms}"),
        });
    }

    if config.resolver.poll_interval_ms == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "resolver.poll_interval_ms must be greater than zero".to_string(),
        });
    }

    Ok(())
}
