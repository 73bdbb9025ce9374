//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// The configuration file name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "genmap.toml";

/// Loads and validates a `genmap.toml` configuration from a project directory.
///
/// Reads `<project_dir>/genmap.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `genmap.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    let required = [
        ("project.name", &config.project.name),
        ("project.netlist", &config.project.netlist),
        ("library.main", &config.library.main),
        ("library.input", &config.library.input),
        ("library.output", &config.library.output),
    ];
    for (field, value) in required {
        if value.is_empty() {
            return Err(ConfigError::MissingField(field.to_string()));
        }
    }
    if config.search.iterations == 0 {
        return Err(ConfigError::ValidationError(
            "search.iterations must be positive".to_string(),
        ));
    }
    if config.search.max_permutations == 0 {
        return Err(ConfigError::ValidationError(
            "search.max_permutations must be positive".to_string(),
        ));
    }
    Ok(())
}
