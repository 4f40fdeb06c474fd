//! Tests for loading validator configuration from TOML.

use std::io::Write;

use schemagate::microversion::ApiVersion;
use schemagate::{compute, ConfigError, ResponseValidation, ValidatorConfig};
use serde_json::json;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
response_validation = "ignore"

[name]
pattern = '^[a-z][a-z0-9-]*$'
reason = "lowercase letters, digits and hyphens"
"#
    )
    .unwrap();

    let config = ValidatorConfig::from_file(file.path()).unwrap();
    assert_eq!(config.response_validation, ResponseValidation::Ignore);
    assert_eq!(config.name.reason, "lowercase letters, digits and hyphens");
    assert_eq!(config.az_name, ValidatorConfig::default().az_name);
}

#[test]
fn test_configured_catalog_uses_modes() {
    let config = ValidatorConfig::from_toml_str(r#"response_validation = "error""#).unwrap();
    let catalog = compute::catalog(&config).unwrap();
    assert_eq!(catalog.response_validation(), ResponseValidation::Error);

    let err = catalog
        .validate_response("server_tags.index", ApiVersion::new(2, 26), &json!({"tags": "web"}))
        .unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute tags. Value: web. 'web' is not of type 'array'"
    );
}

#[test]
fn test_bad_name_pattern_fails_catalog() {
    let config = ValidatorConfig::from_toml_str(
        r#"
[az_name_with_leading_trailing_spaces]
pattern = '(unclosed'
reason = "never used"
"#,
    )
    .unwrap();
    let err = compute::catalog(&config).unwrap_err();
    assert!(
        err.to_string()
            .starts_with("invalid pattern for name policy 'az_name_with_leading_trailing_spaces'"),
        "{err}"
    );
}

#[test]
fn test_invalid_mode_rejected() {
    let result = ValidatorConfig::from_toml_str(r#"response_validation = "loud""#);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("schemagate.toml");
    let err = ValidatorConfig::from_file(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("schemagate.toml"));
}
