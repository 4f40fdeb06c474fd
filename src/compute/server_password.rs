//! Encrypted admin password of a server: `/servers/{id}/os-server-password`.

use serde_json::{json, Value};

use crate::catalog::{CatalogError, SchemaCatalog, SchemaRole};

use super::{parameter_types, since};

pub fn index_response() -> Value {
    json!({
        "type": "object",
        "properties": {
            "password": {"type": "string"}
        },
        "required": ["password"],
        "additionalProperties": false
    })
}

pub(crate) fn register(catalog: &SchemaCatalog) -> Result<(), CatalogError> {
    let v2_1 = since("2.1")?;
    let query = parameter_types::open_query();
    let null = json!({"type": "null"});

    catalog.register("server_password.index", SchemaRole::Query, v2_1, &query)?;
    catalog.register("server_password.index", SchemaRole::Response, v2_1, &index_response())?;
    catalog.register("server_password.clear", SchemaRole::Response, v2_1, &null)?;
    Ok(())
}
