//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ModuleConfig;
use std::path::Path;

/// Name of the configuration file inside a module's project directory.
pub const CONFIG_FILE: &str = "layoutbind.toml";

/// Loads and validates a `layoutbind.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ModuleConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `layoutbind.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ModuleConfig, ConfigError> {
    let config: ModuleConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are consistent.
fn validate_config(config: &ModuleConfig) -> Result<(), ConfigError> {
    let package = &config.module.package;
    if package.is_empty() {
        return Err(ConfigError::MissingField("module.package".to_string()));
    }
    if !is_dotted_identifier(package) {
        return Err(ConfigError::ValidationError(format!(
            "module.package '{package}' is not a dotted identifier"
        )));
    }
    if config.paths.info_dir.is_empty() {
        return Err(ConfigError::MissingField("paths.info_dir".to_string()));
    }
    if config.paths.log_dir.is_empty() {
        return Err(ConfigError::MissingField("paths.log_dir".to_string()));
    }
    Ok(())
}

/// Returns `true` for names like `com.example.app`: non-empty segments of
/// identifier characters, none starting with a digit.
fn is_dotted_identifier(name: &str) -> bool {
    name.split('.').all(|segment| {
        let mut chars = segment.chars();
        match chars.next() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                chars.all(|c| c.is_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}
