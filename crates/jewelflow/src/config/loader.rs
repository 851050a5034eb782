use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::schema::{Config, CONFIG_VERSION};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Loads `explicit` when given, else `~/.jewelflow/config.json` when it
/// exists, else the built-in defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        log::debug!("Loading config from {}", path.display());
        return load_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            log::debug!("Loading config from {}", path.display());
            load_config(&path)
        }
        _ => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Returns the canonical config path: `~/.jewelflow/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".jewelflow").join("config.json"))
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    let jobs_file = Path::new(&config.jobs_file);
    let is_bare_name = jobs_file.file_name().map(|n| n == jobs_file.as_os_str()) == Some(true);
    if !is_bare_name {
        return Err(ConfigError::Validation {
            message: format!(
                "jobs_file must be a file name, not a path: {}",
                config.jobs_file
            ),
        });
    }
    if jobs_file.extension().and_then(|e| e.to_str()) != Some("csv") {
        return Err(ConfigError::Validation {
            message: format!("jobs_file must end in .csv: {}", config.jobs_file),
        });
    }

    let mut names = HashSet::new();
    for member in &config.team {
        let trimmed = member.trim();
        if trimmed.is_empty() || trimmed != member {
            return Err(ConfigError::Validation {
                message: format!("Invalid team member name: '{}'", member),
            });
        }
        if !names.insert(trimmed) {
            return Err(ConfigError::Validation {
                message: format!("Duplicate team member: {}", member),
            });
        }
    }

    Ok(())
}
