//! Cold and live migration server actions.
//!
//! `os-migrateLive` changed shape three times:
//!
//! | versions  | body                                                     |
//! |-----------|----------------------------------------------------------|
//! | 2.1-2.24  | `block_migration`, `disk_over_commit` and `host` required |
//! | 2.25-2.29 | `disk_over_commit` removed, `block_migration` may be `auto` |
//! | 2.30-2.67 | adds optional `force`                                     |
//! | 2.68+     | `force` removed again                                     |

use serde_json::{json, Value};

use crate::catalog::{CatalogError, SchemaCatalog, SchemaRole};

use super::{parameter_types, since, until};

/// Target host; `null` lets the scheduler pick.
fn host() -> Value {
    parameter_types::derive(&parameter_types::fqdn(), |h| {
        h["type"] = json!(["string", "null"]);
    })
}

pub fn migrate() -> Value {
    json!({
        "type": "object",
        "properties": {
            "migrate": {
                "type": ["object", "null"],
                "properties": {
                    "host": host()
                },
                "additionalProperties": false
            }
        },
        "required": ["migrate"],
        "additionalProperties": false
    })
}

pub fn migrate_live() -> Value {
    json!({
        "type": "object",
        "properties": {
            "os-migrateLive": {
                "type": "object",
                "properties": {
                    "block_migration": parameter_types::boolean(),
                    "disk_over_commit": parameter_types::boolean(),
                    "host": host()
                },
                "required": ["block_migration", "disk_over_commit", "host"],
                "additionalProperties": false
            }
        },
        "required": ["os-migrateLive"],
        "additionalProperties": false
    })
}

pub fn migrate_live_v2_25() -> Value {
    parameter_types::derive(&migrate_live(), |schema| {
        let action = &mut schema["properties"]["os-migrateLive"];
        if let Some(properties) = action["properties"].as_object_mut() {
            properties.remove("disk_over_commit");
        }
        let block_migration = &mut action["properties"]["block_migration"]["enum"];
        if let Some(spellings) = block_migration.as_array_mut() {
            spellings.push(json!("auto"));
        }
        action["required"] = json!(["block_migration", "host"]);
    })
}

pub fn migrate_live_v2_30() -> Value {
    parameter_types::derive(&migrate_live_v2_25(), |schema| {
        schema["properties"]["os-migrateLive"]["properties"]["force"] = parameter_types::boolean();
    })
}

pub fn migrate_live_v2_68() -> Value {
    migrate_live_v2_25()
}

pub(crate) fn register(catalog: &SchemaCatalog) -> Result<(), CatalogError> {
    let null = json!({"type": "null"});

    catalog.register("migrate_server.migrate", SchemaRole::Body, since("2.1")?, &migrate())?;
    catalog.register("migrate_server.migrate", SchemaRole::Response, since("2.1")?, &null)?;

    let live = "migrate_server.migrate_live";
    catalog.register(live, SchemaRole::Body, until("2.1", "2.24")?, &migrate_live())?;
    catalog.register(live, SchemaRole::Body, until("2.25", "2.29")?, &migrate_live_v2_25())?;
    catalog.register(live, SchemaRole::Body, until("2.30", "2.67")?, &migrate_live_v2_30())?;
    catalog.register(live, SchemaRole::Body, since("2.68")?, &migrate_live_v2_68())?;
    catalog.register(live, SchemaRole::Response, since("2.1")?, &null)?;
    Ok(())
}
