//! Server tags: `/servers/{id}/tags`, available from 2.26.

use serde_json::{json, Value};

use crate::catalog::{CatalogError, SchemaCatalog, SchemaRole};

use super::{parameter_types, since};

pub fn update_all() -> Value {
    json!({
        "title": "Server tags",
        "type": "object",
        "properties": {
            "tags": {
                "type": "array",
                "items": parameter_types::tag(),
                "maxItems": parameter_types::MAX_TAG_COUNT
            }
        },
        "required": ["tags"],
        "additionalProperties": false
    })
}

/// `PUT /tags/{tag}` carries no body.
pub fn update() -> Value {
    json!({
        "title": "Server tag",
        "type": "null"
    })
}

pub fn index_response() -> Value {
    json!({
        "type": "object",
        "properties": {
            "tags": {
                "type": "array",
                "items": parameter_types::tag()
            }
        },
        "required": ["tags"],
        "additionalProperties": false
    })
}

pub(crate) fn register(catalog: &SchemaCatalog) -> Result<(), CatalogError> {
    let v2_26 = since("2.26")?;
    let null = json!({"type": "null"});
    let query = parameter_types::open_query();

    catalog.register("server_tags.update_all", SchemaRole::Body, v2_26, &update_all())?;
    catalog.register("server_tags.update_all", SchemaRole::Response, v2_26, &index_response())?;
    catalog.register("server_tags.update", SchemaRole::Body, v2_26, &update())?;
    catalog.register("server_tags.update", SchemaRole::Response, v2_26, &null)?;
    catalog.register("server_tags.index", SchemaRole::Query, v2_26, &query)?;
    catalog.register("server_tags.index", SchemaRole::Response, v2_26, &index_response())?;
    catalog.register("server_tags.show", SchemaRole::Query, v2_26, &query)?;
    catalog.register("server_tags.show", SchemaRole::Response, v2_26, &null)?;
    catalog.register("server_tags.delete", SchemaRole::Response, v2_26, &null)?;
    catalog.register("server_tags.delete_all", SchemaRole::Response, v2_26, &null)?;
    Ok(())
}
