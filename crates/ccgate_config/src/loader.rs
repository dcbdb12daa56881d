//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::GatewayConfig;
use std::path::Path;

/// Conventional name of the gateway configuration file.
pub const CONFIG_FILE: &str = "ccgate.toml";

/// Loads and validates a gateway configuration file.
///
/// Relative local sources and a relative cache directory are resolved
/// against the directory containing `path`.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    load_config_from_str(&content, base)
}

/// Parses and validates a gateway configuration from a string.
///
/// `base_dir` plays the role of the config file's directory.
pub fn load_config_from_str(content: &str, base_dir: &Path) -> Result<GatewayConfig, ConfigError> {
    let mut config: GatewayConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
    validate_config(&config)?;

    if !base_dir.as_os_str().is_empty() {
        config.compile.rebase_sources(base_dir);
        if let Some(dir) = config.cache.dir.as_mut() {
            if !dir.as_os_str().is_empty() && dir.is_relative() {
                *dir = base_dir.join(&*dir);
            }
        }
    }
    Ok(config)
}

/// Validates that required fields are present and values are consistent.
fn validate_config(config: &GatewayConfig) -> Result<(), ConfigError> {
    if config.compile.sources().is_empty() {
        return Err(ConfigError::MissingField {
            field: "compile.sources".to_string(),
        });
    }
    if config.remote.host.is_empty() {
        return Err(ConfigError::MissingField {
            field: "remote.host".to_string(),
        });
    }
    if !config.remote.path.starts_with('/') {
        return Err(ConfigError::Validation {
            reason: format!(
                "remote.path must start with '/', got '{}'",
                config.remote.path
            ),
        });
    }
    Ok(())
}
