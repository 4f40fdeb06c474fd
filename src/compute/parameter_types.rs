//! Schema fragments shared by the compute API operations.

use serde_json::{json, Value};

/// Most tags a single server may carry.
pub const MAX_TAG_COUNT: usize = 50;

/// Pattern for user metadata keys.
pub const METADATA_KEY_PATTERN: &str = r"^[a-zA-Z0-9\-_:. ]{1,255}$";

/// A boolean, or one of its accepted string spellings.
pub fn boolean() -> Value {
    json!({
        "type": ["boolean", "string"],
        "enum": [
            true, "True", "TRUE", "true", "1", "ON", "On", "on", "YES", "Yes", "yes",
            false, "False", "FALSE", "false", "0", "OFF", "Off", "off", "NO", "No", "no"
        ]
    })
}

/// A non-negative integer, as a number or a string of digits.
pub fn non_negative_integer() -> Value {
    json!({
        "type": ["integer", "string"],
        "pattern": "^[0-9]*$",
        "minimum": 0,
        "minLength": 1
    })
}

/// A positive integer, as a number or a string of digits.
pub fn positive_integer() -> Value {
    json!({
        "type": ["integer", "string"],
        "pattern": "^[0-9]*$",
        "minimum": 1,
        "minLength": 1
    })
}

/// A query parameter that may repeat; each occurrence must match `schema`.
pub fn multi_params(schema: Value) -> Value {
    json!({
        "type": "array",
        "items": schema
    })
}

/// User metadata: string values under restricted keys.
pub fn metadata() -> Value {
    json!({
        "type": "object",
        "patternProperties": {
            METADATA_KEY_PATTERN: {
                "type": "string",
                "maxLength": 255
            }
        },
        "additionalProperties": false
    })
}

/// Metadata as returned by the API, where keys were validated on the way in.
pub fn metadata_response() -> Value {
    json!({
        "type": "object",
        "patternProperties": {
            "^.{1,255}$": {
                "type": "string",
                "maxLength": 255
            }
        },
        "additionalProperties": false
    })
}

/// A resource name checked by the configured `name` policy.
pub fn name() -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "maxLength": 255,
        "format": "name"
    })
}

pub fn tag() -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "maxLength": 60,
        "pattern": "^[^,/]*$"
    })
}

pub fn fqdn() -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "maxLength": 255,
        "pattern": r"^[a-zA-Z0-9\-._]*$"
    })
}

pub fn hostname() -> Value {
    json!({
        "type": "string",
        "minLength": 2,
        "maxLength": 255,
        "pattern": r"^[a-zA-Z0-9]+[a-zA-Z0-9\-]*[a-zA-Z0-9]+$"
    })
}

/// An IPv4 or IPv6 address.
pub fn ip_address() -> Value {
    json!({
        "type": "string",
        "anyOf": [{"format": "ipv4"}, {"format": "ipv6"}]
    })
}

pub fn project_id() -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "maxLength": 255,
        "pattern": "^[a-zA-Z0-9-]*$"
    })
}

/// A query string with no declared parameters that tolerates any.
pub fn open_query() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "additionalProperties": true
    })
}

/// Copies `base`, applying `edit` to the copy.
pub fn derive(base: &Value, edit: impl FnOnce(&mut Value)) -> Value {
    let mut derived = base.clone();
    edit(&mut derived);
    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorConfig;
    use crate::format::FormatRegistry;
    use crate::{CompiledSchema, ValidationContext};

    fn accepts(schema: &Value, value: Value) -> bool {
        let formats = FormatRegistry::standard(&ValidatorConfig::default()).unwrap();
        CompiledSchema::compile(schema, &formats)
            .unwrap()
            .validate(&value, &ValidationContext::default())
            .is_success()
    }

    #[test]
    fn test_boolean_spellings() {
        let schema = boolean();
        for value in [json!(true), json!("yes"), json!("Off"), json!("0")] {
            assert!(accepts(&schema, value.clone()), "{value} should be accepted");
        }
        for value in [json!("yEs"), json!(1), json!("maybe")] {
            assert!(!accepts(&schema, value.clone()), "{value} should be rejected");
        }
    }

    #[test]
    fn test_integers_as_strings() {
        assert!(accepts(&non_negative_integer(), json!("0")));
        assert!(accepts(&non_negative_integer(), json!(7)));
        assert!(!accepts(&non_negative_integer(), json!("")));
        assert!(!accepts(&non_negative_integer(), json!("-1")));
        assert!(!accepts(&non_negative_integer(), json!(-1)));
        assert!(!accepts(&positive_integer(), json!("0")));
        assert!(accepts(&positive_integer(), json!("12")));
    }

    #[test]
    fn test_metadata_keys() {
        assert!(accepts(&metadata(), json!({"key-1_a:b. c": "v"})));
        assert!(!accepts(&metadata(), json!({"bad/key": "v"})));
        assert!(!accepts(&metadata(), json!({"key": 1})));
    }

    #[test]
    fn test_tag_and_hosts() {
        assert!(accepts(&tag(), json!("web")));
        assert!(!accepts(&tag(), json!("a,b")));
        assert!(accepts(&fqdn(), json!("compute-1.example.org")));
        assert!(!accepts(&fqdn(), json!("bad host")));
        assert!(accepts(&hostname(), json!("vm-01")));
        assert!(!accepts(&hostname(), json!("-vm")));
    }

    #[test]
    fn test_ip_address_accepts_both_families() {
        assert!(accepts(&ip_address(), json!("10.0.0.3")));
        assert!(accepts(&ip_address(), json!("fd00::3")));
        assert!(!accepts(&ip_address(), json!("10.0.0")));
        assert!(!accepts(&ip_address(), json!(10)));
    }

    #[test]
    fn test_derive_leaves_base_untouched() {
        let base = fqdn();
        let nullable = derive(&base, |s| s["type"] = json!(["string", "null"]));
        assert_eq!(base["type"], json!("string"));
        assert!(accepts(&nullable, json!(null)));
    }
}
