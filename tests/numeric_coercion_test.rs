//! Tests for numeric bounds applied to numbers sent as strings.

use std::sync::Arc;

use schemagate::format::FormatRegistry;
use schemagate::{SchemaValidator, ValidatorConfig};
use serde_json::{json, Value};

fn size_validator(size_schema: Value) -> SchemaValidator {
    let formats = Arc::new(FormatRegistry::standard(&ValidatorConfig::default()).unwrap());
    let schema = json!({
        "type": "object",
        "properties": {"size": size_schema}
    });
    SchemaValidator::new(&schema, formats, false, true).unwrap()
}

#[test]
fn test_minimum_accepts_numeric_strings() {
    let validator = size_validator(json!({"type": ["integer", "string"], "minimum": 1}));

    assert!(validator.validate(&json!({"size": "5"})).is_ok());
    assert!(validator.validate(&json!({"size": 5})).is_ok());
    assert!(validator.validate(&json!({"size": " 7 "})).is_ok());

    let err = validator.validate(&json!({"size": "0"})).unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute size. Value: 0. 0 is less than the minimum of 1"
    );
    assert_eq!(err.violation().instance, json!("0"));
}

#[test]
fn test_maximum_accepts_numeric_strings() {
    let validator = size_validator(json!({"type": ["number", "string"], "maximum": 10}));

    assert!(validator.validate(&json!({"size": "10"})).is_ok());
    assert!(validator.validate(&json!({"size": "9.5"})).is_ok());

    let err = validator.validate(&json!({"size": "10.5"})).unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute size. Value: 10.5. \
         10.5 is greater than the maximum of 10"
    );
}

#[test]
fn test_unparsable_strings_skip_bounds() {
    let validator = size_validator(json!({"type": ["integer", "string"], "minimum": 1}));
    assert!(validator.validate(&json!({"size": "abc"})).is_ok());
    assert!(validator.validate(&json!({"size": ""})).is_ok());
}

#[test]
fn test_type_still_decides_acceptance() {
    let validator = size_validator(json!({"type": "integer", "minimum": 1}));
    let err = validator.validate(&json!({"size": "5"})).unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute size. Value: 5. '5' is not of type 'integer'"
    );
}

#[test]
fn test_booleans_are_not_numbers() {
    let validator = size_validator(json!({"minimum": 5}));
    assert!(validator.validate(&json!({"size": true})).is_ok());
}

#[test]
fn test_pattern_and_bound_combined() {
    let validator = size_validator(json!({
        "type": ["integer", "string"],
        "pattern": "^[0-9]+$",
        "minimum": 1
    }));

    assert!(validator.validate(&json!({"size": "12"})).is_ok());

    let err = validator.validate(&json!({"size": "-3"})).unwrap_err();
    let violations = validator.violations(&json!({"size": "-3"})).unwrap_err();
    assert_eq!(violations.len(), 2);
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute size. Value: -3. '-3' does not match '^[0-9]+$'"
    );
}

#[test]
fn test_infinite_strings_fail_bounds() {
    let validator = size_validator(json!({"type": ["string", "integer"], "maximum": 10}));

    for raw in ["inf", "1e999", "Infinity"] {
        let err = validator.validate(&json!({"size": raw})).unwrap_err();
        assert_eq!(
            err.detail(),
            format!(
                "Invalid input for field/attribute size. Value: {raw}. \
                 inf is greater than the maximum of 10"
            )
        );
    }

    let validator = size_validator(json!({"type": ["string", "integer"], "minimum": 0}));
    let err = validator.validate(&json!({"size": "-1e999"})).unwrap_err();
    assert!(err.detail().ends_with("-inf is less than the minimum of 0"), "{}", err.detail());
}

#[test]
fn test_exclusive_bounds_ignore_strings() {
    let validator = size_validator(json!({
        "type": ["string", "integer"],
        "exclusiveMinimum": 0,
        "exclusiveMaximum": 100
    }));
    assert!(validator.validate(&json!({"size": "0"})).is_ok());
    assert!(validator.validate(&json!({"size": "100"})).is_ok());
    assert!(validator.validate(&json!({"size": 50})).is_ok());

    let err = validator.validate(&json!({"size": 0})).unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute size. Value: 0. \
         0 is less than or equal to the minimum of 0"
    );
    assert!(validator.validate(&json!({"size": 100})).is_err());
}

#[test]
fn test_boolean_exclusive_bound_is_not_a_schema() {
    let formats = Arc::new(FormatRegistry::standard(&ValidatorConfig::default()).unwrap());
    let schema = json!({"minimum": 0, "exclusiveMinimum": true});
    assert!(SchemaValidator::new(&schema, formats, false, true).is_err());
}

#[test]
fn test_large_and_negative_values() {
    let validator = size_validator(json!({"minimum": -10, "maximum": 18446744073709551615u64}));
    assert!(validator.validate(&json!({"size": "-10"})).is_ok());
    assert!(validator.validate(&json!({"size": "18446744073709551615"})).is_ok());
    assert!(validator.validate(&json!({"size": "-11"})).is_err());
}
