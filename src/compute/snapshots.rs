//! Volume snapshot proxy API: `/os-snapshots`.

use serde_json::{json, Value};

use crate::catalog::{CatalogError, SchemaCatalog, SchemaRole};

use super::{parameter_types, since, until};

pub fn create() -> Value {
    json!({
        "type": "object",
        "properties": {
            "snapshot": {
                "type": "object",
                "properties": {
                    "volume_id": {"type": "string"},
                    "force": parameter_types::boolean(),
                    "display_name": {"type": "string"},
                    "display_description": {"type": "string"}
                },
                "required": ["volume_id"],
                "additionalProperties": false
            }
        },
        "required": ["snapshot"],
        "additionalProperties": false
    })
}

/// Paging parameters. Unknown parameters are stripped before 2.75.
pub fn index_query() -> Value {
    json!({
        "type": "object",
        "properties": {
            "limit": parameter_types::multi_params(parameter_types::non_negative_integer()),
            "offset": parameter_types::multi_params(parameter_types::non_negative_integer())
        },
        "additionalProperties": true
    })
}

/// From 2.75 unknown parameters are rejected.
pub fn index_query_v2_75() -> Value {
    parameter_types::derive(&index_query(), |q| {
        q["additionalProperties"] = json!(false);
    })
}

pub(crate) fn register(catalog: &SchemaCatalog) -> Result<(), CatalogError> {
    let v2_1 = since("2.1")?;
    let before_v2_75 = until("2.1", "2.74")?;
    let v2_75 = since("2.75")?;

    catalog.register("snapshots.create", SchemaRole::Body, v2_1, &create())?;
    for operation in ["snapshots.index", "snapshots.detail"] {
        catalog.register(operation, SchemaRole::Query, before_v2_75, &index_query())?;
        catalog.register(operation, SchemaRole::Query, v2_75, &index_query_v2_75())?;
    }
    catalog.register("snapshots.show", SchemaRole::Query, v2_1, &parameter_types::open_query())?;
    Ok(())
}
