//! Server metadata: `/servers/{id}/metadata`.

use serde_json::{json, Value};

use crate::catalog::{CatalogError, SchemaCatalog, SchemaRole};

use super::{parameter_types, since};

pub fn create() -> Value {
    json!({
        "type": "object",
        "properties": {
            "metadata": parameter_types::metadata()
        },
        "required": ["metadata"],
        "additionalProperties": false
    })
}

/// Setting a single key: exactly one entry under `meta`.
pub fn update() -> Value {
    let meta = parameter_types::derive(&parameter_types::metadata(), |m| {
        m["minProperties"] = json!(1);
        m["maxProperties"] = json!(1);
    });
    json!({
        "type": "object",
        "properties": {
            "meta": meta
        },
        "required": ["meta"],
        "additionalProperties": false
    })
}

pub fn update_all() -> Value {
    create()
}

pub fn index_response() -> Value {
    json!({
        "type": "object",
        "properties": {
            "metadata": parameter_types::metadata_response()
        },
        "required": ["metadata"],
        "additionalProperties": false
    })
}

pub fn show_response() -> Value {
    let meta = parameter_types::derive(&parameter_types::metadata_response(), |m| {
        m["minProperties"] = json!(1);
        m["maxProperties"] = json!(1);
    });
    json!({
        "type": "object",
        "properties": {
            "meta": meta
        },
        "required": ["meta"],
        "additionalProperties": false
    })
}

pub(crate) fn register(catalog: &SchemaCatalog) -> Result<(), CatalogError> {
    let v2_1 = since("2.1")?;
    let null = json!({"type": "null"});
    let query = parameter_types::open_query();
    let (index, show) = (index_response(), show_response());

    catalog.register("server_metadata.create", SchemaRole::Body, v2_1, &create())?;
    catalog.register("server_metadata.create", SchemaRole::Response, v2_1, &index)?;
    catalog.register("server_metadata.update", SchemaRole::Body, v2_1, &update())?;
    catalog.register("server_metadata.update", SchemaRole::Response, v2_1, &show)?;
    catalog.register("server_metadata.update_all", SchemaRole::Body, v2_1, &update_all())?;
    catalog.register("server_metadata.update_all", SchemaRole::Response, v2_1, &index)?;
    catalog.register("server_metadata.index", SchemaRole::Query, v2_1, &query)?;
    catalog.register("server_metadata.index", SchemaRole::Response, v2_1, &index)?;
    catalog.register("server_metadata.show", SchemaRole::Query, v2_1, &query)?;
    catalog.register("server_metadata.show", SchemaRole::Response, v2_1, &show)?;
    catalog.register("server_metadata.delete", SchemaRole::Response, v2_1, &null)?;
    Ok(())
}
