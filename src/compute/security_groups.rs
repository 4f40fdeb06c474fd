//! Security group proxy API: `/os-security-groups`,
//! `/os-security-group-rules` and the server `addSecurityGroup` and
//! `removeSecurityGroup` actions.
//!
//! The proxy was deprecated in 2.36. Its request bodies and query strings
//! keep tolerating undeclared properties, so lenient and strict callers see
//! the same behavior.

use serde_json::{json, Value};

use crate::catalog::{CatalogError, SchemaCatalog, SchemaRole};

use super::{parameter_types, since};

pub fn create() -> Value {
    json!({
        "type": "object",
        "properties": {
            "security_group": {
                "type": "object",
                "properties": {
                    "name": {"type": "string", "minLength": 0, "maxLength": 255},
                    "description": {"type": "string", "minLength": 0, "maxLength": 255}
                },
                "required": ["name", "description"],
                "additionalProperties": true
            }
        },
        "required": ["security_group"],
        "additionalProperties": true
    })
}

pub fn update() -> Value {
    create()
}

/// Only the group references are checked. Ports, protocol and CIDR are
/// passed through to the network service unvalidated.
pub fn create_rules() -> Value {
    json!({
        "type": "object",
        "properties": {
            "security_group_rule": {
                "type": "object",
                "properties": {
                    "group_id": {"type": ["string", "null"], "format": "uuid"},
                    "parent_group_id": {"type": "string", "format": "uuid"},
                    "to_port": {},
                    "from_port": {},
                    "ip_protocol": {},
                    "cidr": {}
                },
                "required": ["parent_group_id"],
                "additionalProperties": true
            }
        },
        "required": ["security_group_rule"],
        "additionalProperties": true
    })
}

pub fn index_query() -> Value {
    json!({
        "type": "object",
        "properties": {
            "limit": parameter_types::multi_params(parameter_types::non_negative_integer()),
            "offset": parameter_types::multi_params(parameter_types::non_negative_integer()),
            "all_tenants": parameter_types::multi_params(json!({"type": "string"}))
        },
        "additionalProperties": true
    })
}

fn server_action(action: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            action: {
                "type": "object",
                "properties": {
                    "name": {"type": "string", "minLength": 1}
                },
                "required": ["name"],
                "additionalProperties": false
            }
        },
        "required": [action],
        "additionalProperties": true
    })
}

pub fn add_security_group() -> Value {
    server_action("addSecurityGroup")
}

pub fn remove_security_group() -> Value {
    server_action("removeSecurityGroup")
}

fn rule() -> Value {
    json!({
        "type": "object",
        "properties": {
            "from_port": {"type": ["integer", "null"], "minimum": -1},
            "group": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "tenant_id": parameter_types::project_id()
                },
                "required": [],
                "additionalProperties": false
            },
            "id": {"type": "string", "format": "uuid"},
            "ip_protocol": {"type": ["string", "null"]},
            "ip_range": {
                "type": "object",
                "properties": {
                    "cidr": {"type": "string", "format": "cidr"}
                },
                "required": [],
                "additionalProperties": false
            },
            "parent_group_id": {"type": "string", "format": "uuid"},
            "to_port": {"type": ["integer", "null"], "minimum": -1}
        },
        "required": [
            "from_port",
            "group",
            "id",
            "ip_protocol",
            "ip_range",
            "parent_group_id",
            "to_port"
        ],
        "additionalProperties": false
    })
}

fn group() -> Value {
    json!({
        "type": "object",
        "properties": {
            "description": {"type": ["string", "null"]},
            "id": {"type": "string", "format": "uuid"},
            "name": {"type": "string"},
            "rules": {"type": "array", "items": rule()},
            "tenant_id": parameter_types::project_id()
        },
        "required": [],
        "additionalProperties": false
    })
}

pub fn show_response() -> Value {
    json!({
        "type": "object",
        "properties": {
            "security_group": group()
        },
        "required": ["security_group"],
        "additionalProperties": false
    })
}

pub fn index_response() -> Value {
    json!({
        "type": "object",
        "properties": {
            "security_groups": {
                "type": "array",
                "items": group()
            }
        },
        "required": ["security_groups"],
        "additionalProperties": false
    })
}

pub fn create_rule_response() -> Value {
    json!({
        "type": "object",
        "properties": {
            "security_group_rule": rule()
        },
        "required": ["security_group_rule"],
        "additionalProperties": false
    })
}

pub(crate) fn register(catalog: &SchemaCatalog) -> Result<(), CatalogError> {
    let v2_1 = since("2.1")?;
    let null = json!({"type": "null"});
    let open = parameter_types::open_query();
    let (show, index) = (show_response(), index_response());

    catalog.register("security_groups.create", SchemaRole::Body, v2_1, &create())?;
    catalog.register("security_groups.create", SchemaRole::Response, v2_1, &show)?;
    catalog.register("security_groups.update", SchemaRole::Body, v2_1, &update())?;
    catalog.register("security_groups.update", SchemaRole::Response, v2_1, &show)?;
    catalog.register("security_groups.show", SchemaRole::Query, v2_1, &open)?;
    catalog.register("security_groups.show", SchemaRole::Response, v2_1, &show)?;
    catalog.register("security_groups.index", SchemaRole::Query, v2_1, &index_query())?;
    catalog.register("security_groups.index", SchemaRole::Response, v2_1, &index)?;
    catalog.register("security_groups.delete", SchemaRole::Response, v2_1, &null)?;

    let rule_response = create_rule_response();
    catalog.register("security_group_rules.create", SchemaRole::Body, v2_1, &create_rules())?;
    catalog.register("security_group_rules.create", SchemaRole::Response, v2_1, &rule_response)?;
    catalog.register("security_group_rules.delete", SchemaRole::Response, v2_1, &null)?;

    catalog.register("server_security_groups.index", SchemaRole::Query, v2_1, &open)?;
    catalog.register("server_security_groups.index", SchemaRole::Response, v2_1, &index)?;
    for (operation, body) in [
        ("server_security_groups.add", add_security_group()),
        ("server_security_groups.remove", remove_security_group()),
    ] {
        catalog.register(operation, SchemaRole::Body, v2_1, &body)?;
        catalog.register(operation, SchemaRole::Response, v2_1, &null)?;
    }
    Ok(())
}
