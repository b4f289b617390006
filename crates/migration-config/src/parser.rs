//! Configuration parser with environment variable substitution

use crate::{Config, ConfigError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// The only configuration version understood
pub const SUPPORTED_VERSION: &str = "1.0";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

static ENV_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Parse a YAML configuration file
pub fn parse_file(path: impl AsRef<Path>) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parse YAML configuration from a string
pub fn parse_str(content: &str) -> Result<Config> {
    let mut config: Config = serde_yaml::from_str(content)?;
    validate_config(&config)?;
    resolve_env(&mut config)?;
    Ok(config)
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.version != SUPPORTED_VERSION {
        return Err(ConfigError::ValidationError(format!(
            "Unsupported version: {}, expected {}",
            config.version, SUPPORTED_VERSION
        )));
    }

    if let Some(level) = &config.settings.log_level {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Unknown log level '{}', expected one of {}",
                level,
                LOG_LEVELS.join(", ")
            )));
        }
    }

    if config.store.in_memory && config.store.path.is_some() {
        return Err(ConfigError::ValidationError(
            "Store cannot set both 'path' and 'in_memory'".to_string(),
        ));
    }

    for (field, value) in [
        ("store.path", &config.store.path),
        ("output.path", &config.output.path),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "'{}' must not be empty",
                field
            )));
        }
    }

    Ok(())
}

/// Substitute environment variables in every path
fn resolve_env(config: &mut Config) -> Result<()> {
    for value in [&mut config.store.path, &mut config.output.path]
        .into_iter()
        .flatten()
    {
        *value = substitute_env_vars(value)?;
    }
    Ok(())
}

/// Substitute environment variables in a string
pub fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in ENV_REF.captures_iter(input) {
        let full_match = &cap[0];
        let var_expr = &cap[1];

        // ${VAR:-default}
        let (var_name, default_value) = match var_expr.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (var_expr, None),
        };

        match std::env::var(var_name) {
            Ok(value) => {
                result = result.replace(full_match, &value);
            }
            Err(_) => {
                if let Some(default) = default_value {
                    result = result.replace(full_match, default);
                } else {
                    errors.push(var_name.to_string());
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(ConfigError::EnvVarNotFound(errors.join(", ")));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_substitution() {
        if let Ok(home) = std::env::var("HOME") {
            let result = substitute_env_vars("${HOME}/store").unwrap();
            assert_eq!(result, format!("{}/store", home));
        } else {
            println!("Skipping test - HOME is not set");
        }
    }

    #[test]
    fn test_env_var_with_default() {
        let result =
            substitute_env_vars("${MISSING_VAR_UNLIKELY_TO_EXIST:-/tmp/store}/db").unwrap();
        assert_eq!(result, "/tmp/store/db");
    }

    #[test]
    fn test_missing_env_vars_are_all_reported() {
        let err = substitute_env_vars("${MISSING_ONE_UNLIKELY}/${MISSING_TWO_UNLIKELY}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Environment variable not found: MISSING_ONE_UNLIKELY, MISSING_TWO_UNLIKELY"
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_str("version: \"1.0\"\n").unwrap();
        assert_eq!(config.version, "1.0");
        assert!(!config.store.in_memory);
        assert_eq!(config.export, crate::ExportConfig::default());
    }
}
