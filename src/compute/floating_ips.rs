//! Floating IP proxy API: `/os-floating-ips` and the server
//! `addFloatingIp`/`removeFloatingIp` actions.

use serde_json::{json, Value};

use crate::catalog::{CatalogError, SchemaCatalog, SchemaRole};

use super::{parameter_types, since};

/// The body is optional; `pool` picks the network to allocate from.
pub fn create() -> Value {
    json!({
        "type": ["object", "null"],
        "properties": {
            "pool": {"type": ["string", "null"]}
        }
    })
}

pub fn add_floating_ip() -> Value {
    json!({
        "type": "object",
        "properties": {
            "addFloatingIp": {
                "type": "object",
                "properties": {
                    "address": parameter_types::ip_address(),
                    "fixed_address": parameter_types::ip_address()
                },
                "required": ["address"],
                "additionalProperties": false
            }
        },
        "required": ["addFloatingIp"],
        "additionalProperties": false
    })
}

pub fn remove_floating_ip() -> Value {
    json!({
        "type": "object",
        "properties": {
            "removeFloatingIp": {
                "type": "object",
                "properties": {
                    "address": parameter_types::ip_address()
                },
                "required": ["address"],
                "additionalProperties": false
            }
        },
        "required": ["removeFloatingIp"],
        "additionalProperties": false
    })
}

fn floating_ip() -> Value {
    json!({
        "type": "object",
        "properties": {
            "fixed_ip": {
                "type": ["string", "null"],
                "anyOf": [{"format": "ipv4"}, {"format": "ipv6"}]
            },
            "id": {"type": "string", "format": "uuid"},
            "instance_id": {"type": ["string", "null"], "format": "uuid"},
            "ip": {
                "type": "string",
                "anyOf": [{"format": "ipv4"}, {"format": "ipv6"}]
            },
            "pool": {"type": "string"}
        },
        "required": ["fixed_ip", "id", "instance_id", "ip", "pool"],
        "additionalProperties": false
    })
}

pub fn show_response() -> Value {
    json!({
        "type": "object",
        "properties": {
            "floating_ip": floating_ip()
        },
        "required": ["floating_ip"],
        "additionalProperties": false
    })
}

pub fn index_response() -> Value {
    json!({
        "type": "object",
        "properties": {
            "floating_ips": {
                "type": "array",
                "items": floating_ip()
            }
        },
        "required": ["floating_ips"],
        "additionalProperties": false
    })
}

pub(crate) fn register(catalog: &SchemaCatalog) -> Result<(), CatalogError> {
    let v2_1 = since("2.1")?;
    let null = json!({"type": "null"});
    // Deprecated proxy: any query string is accepted as sent.
    let any = json!({});

    catalog.register("floating_ips.create", SchemaRole::Body, v2_1, &create())?;
    catalog.register("floating_ips.create", SchemaRole::Response, v2_1, &show_response())?;
    catalog.register("floating_ips.index", SchemaRole::Query, v2_1, &any)?;
    catalog.register("floating_ips.index", SchemaRole::Response, v2_1, &index_response())?;
    catalog.register("floating_ips.show", SchemaRole::Query, v2_1, &any)?;
    catalog.register("floating_ips.show", SchemaRole::Response, v2_1, &show_response())?;
    catalog.register("floating_ips.delete", SchemaRole::Response, v2_1, &null)?;

    catalog.register("floating_ips.add", SchemaRole::Body, v2_1, &add_floating_ip())?;
    catalog.register("floating_ips.add", SchemaRole::Response, v2_1, &null)?;
    catalog.register("floating_ips.remove", SchemaRole::Body, v2_1, &remove_floating_ip())?;
    catalog.register("floating_ips.remove", SchemaRole::Response, v2_1, &null)?;
    Ok(())
}
