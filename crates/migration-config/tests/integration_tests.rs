//! Integration tests for migration-config

use migration_config::{ConfigError, ExportConfig, OutputFormat, parser};
use std::io::Write;

#[test]
fn test_full_config_parsing() {
    let yaml = r#"
version: "1.0"
name: "staging"
description: "Nightly export of the staging model"

settings:
  log_level: debug

store:
  path: "${MISSING_DATA_DIR_UNLIKELY:-/var/lib/model}/store"

export:
  skip_status_history: true
  skip_ssh_host_keys: true
  ignore_incomplete_model: true

output:
  format: yaml
  path: "snapshot.yaml"
"#;

    let config = parser::parse_str(yaml).unwrap();
    assert_eq!(config.name.as_deref(), Some("staging"));
    assert_eq!(config.settings.log_level.as_deref(), Some("debug"));
    assert_eq!(config.store.path.as_deref(), Some("/var/lib/model/store"));
    assert_eq!(config.output.format, OutputFormat::Yaml);
    assert_eq!(config.output.path.as_deref(), Some("snapshot.yaml"));
    assert_eq!(
        config.export,
        ExportConfig {
            skip_status_history: true,
            skip_ssh_host_keys: true,
            ignore_incomplete_model: true,
            ..ExportConfig::default()
        }
    );
}

#[test]
fn test_unknown_export_toggle_is_rejected() {
    let yaml = r#"
version: "1.0"
export:
  skip_everything: true
"#;
    let err = parser::parse_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::YamlError(_)));
    assert!(err.to_string().contains("skip_everything"));
}

#[test]
fn test_unsupported_version() {
    let err = parser::parse_str("version: \"2.0\"\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid configuration: Unsupported version: 2.0, expected 1.0"
    );
}

#[test]
fn test_unknown_log_level() {
    let yaml = r#"
version: "1.0"
settings:
  log_level: chatty
"#;
    let err = parser::parse_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn test_store_path_and_in_memory_conflict() {
    let yaml = r#"
version: "1.0"
store:
  path: /tmp/store
  in_memory: true
"#;
    let err = parser::parse_str(yaml).unwrap_err();
    assert!(err.to_string().contains("in_memory"));
}

#[test]
fn test_missing_env_var_in_path() {
    let yaml = r#"
version: "1.0"
output:
  path: "${MISSING_OUTPUT_DIR_UNLIKELY}/snapshot.json"
"#;
    let err = parser::parse_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::EnvVarNotFound(ref v) if v == "MISSING_OUTPUT_DIR_UNLIKELY"));
}

#[test]
fn test_output_format_from_str() {
    assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
    assert!("toml".parse::<OutputFormat>().is_err());
}

#[test]
fn test_parse_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "version: \"1.0\"\nstore:\n  in_memory: true").unwrap();

    let config = parser::parse_file(file.path()).unwrap();
    assert!(config.store.in_memory);
    assert_eq!(config.output.format, OutputFormat::Json);
}

#[test]
fn test_missing_file() {
    let err = parser::parse_file("/nonexistent/migration.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::ReadError(_)));
}
