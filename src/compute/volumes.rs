//! Volume proxy API: `/os-volumes`.

use serde_json::{json, Value};

use crate::catalog::{CatalogError, SchemaCatalog, SchemaRole};

use super::{parameter_types, since};

pub fn create() -> Value {
    json!({
        "type": "object",
        "properties": {
            "volume": {
                "type": "object",
                "properties": {
                    "volume_type": {"type": "string"},
                    "metadata": {"type": "object"},
                    "snapshot_id": {"type": "string"},
                    "size": {
                        "type": ["integer", "string"],
                        "pattern": "^[0-9]+$",
                        "minimum": 1
                    },
                    "availability_zone": {"type": "string"},
                    "display_name": {"type": "string"},
                    "display_description": {"type": "string"}
                },
                "required": ["size"],
                "additionalProperties": false
            }
        },
        "required": ["volume"],
        "additionalProperties": false
    })
}

/// Paging parameters; anything else is tolerated and dropped.
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

pub fn detail_query() -> Value {
    index_query()
}

pub(crate) fn register(catalog: &SchemaCatalog) -> Result<(), CatalogError> {
    let v2_1 = since("2.1")?;

    catalog.register("volumes.create", SchemaRole::Body, v2_1, &create())?;
    catalog.register("volumes.index", SchemaRole::Query, v2_1, &index_query())?;
    catalog.register("volumes.detail", SchemaRole::Query, v2_1, &detail_query())?;
    catalog.register("volumes.show", SchemaRole::Query, v2_1, &parameter_types::open_query())?;
    Ok(())
}
