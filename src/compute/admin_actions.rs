//! Administrative server actions: `os-resetState` and `injectNetworkInfo`.

use serde_json::{json, Value};

use crate::catalog::{CatalogError, SchemaCatalog, SchemaRole};

use super::since;

/// The action value itself is not inspected.
pub fn inject_network_info() -> Value {
    json!({
        "type": "object",
        "properties": {
            "injectNetworkInfo": {}
        },
        "required": ["injectNetworkInfo"],
        "additionalProperties": false
    })
}

pub fn reset_state() -> Value {
    json!({
        "type": "object",
        "properties": {
            "os-resetState": {
                "type": "object",
                "properties": {
                    "state": {
                        "type": "string",
                        "enum": ["active", "error"]
                    }
                },
                "required": ["state"],
                "additionalProperties": false
            }
        },
        "required": ["os-resetState"],
        "additionalProperties": false
    })
}

pub(crate) fn register(catalog: &SchemaCatalog) -> Result<(), CatalogError> {
    let v2_1 = since("2.1")?;
    let null = json!({"type": "null"});

    catalog.register("admin_actions.reset_state", SchemaRole::Body, v2_1, &reset_state())?;
    catalog.register("admin_actions.reset_state", SchemaRole::Response, v2_1, &null)?;
    catalog.register(
        "admin_actions.inject_network_info",
        SchemaRole::Body,
        v2_1,
        &inject_network_info(),
    )?;
    catalog.register("admin_actions.inject_network_info", SchemaRole::Response, v2_1, &null)?;
    // The action was removed; whatever is sent passes through.
    catalog.register("admin_actions.reset_network", SchemaRole::Body, v2_1, &json!({}))?;
    Ok(())
}
