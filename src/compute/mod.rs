//! Request and response schemas of the compute API.
//!
//! Each submodule exposes its schema documents as functions returning JSON,
//! plus a `register` step that files them in a [`SchemaCatalog`] under
//! `<resource>.<action>` operation names with their microversion bands.
//!
//! ```rust
//! use schemagate::microversion::ApiVersion;
//! use schemagate::{compute, ValidatorConfig};
//! use serde_json::json;
//!
//! let catalog = compute::catalog(&ValidatorConfig::default()).unwrap();
//! let body = json!({"os-migrateLive": {"block_migration": "auto", "host": null}});
//!
//! assert!(catalog
//!     .validate_body("migrate_server.migrate_live", ApiVersion::new(2, 25), &body, false)
//!     .is_ok());
//! assert!(catalog
//!     .validate_body("migrate_server.migrate_live", ApiVersion::new(2, 24), &body, false)
//!     .is_err());
//! ```

pub mod admin_actions;
pub mod floating_ips;
pub mod migrate_server;
pub mod parameter_types;
pub mod security_groups;
pub mod server_metadata;
pub mod server_password;
pub mod server_tags;
pub mod snapshots;
pub mod volumes;

use crate::catalog::{CatalogError, SchemaCatalog};
use crate::config::ValidatorConfig;
use crate::microversion::VersionRange;

/// Builds a catalog holding every compute API schema.
pub fn catalog(config: &ValidatorConfig) -> Result<SchemaCatalog, CatalogError> {
    let catalog = SchemaCatalog::new(config)?;
    register_all(&catalog)?;
    tracing::debug!(
        operations = catalog.operations().len(),
        "compute schema catalog ready"
    );
    Ok(catalog)
}

/// Registers every compute API schema in an existing catalog.
pub fn register_all(catalog: &SchemaCatalog) -> Result<(), CatalogError> {
    server_metadata::register(catalog)?;
    volumes::register(catalog)?;
    snapshots::register(catalog)?;
    server_tags::register(catalog)?;
    migrate_server::register(catalog)?;
    floating_ips::register(catalog)?;
    security_groups::register(catalog)?;
    admin_actions::register(catalog)?;
    server_password::register(catalog)?;
    Ok(())
}

fn since(min: &str) -> Result<VersionRange, CatalogError> {
    Ok(VersionRange::parse(min, None)?)
}

fn until(min: &str, max: &str) -> Result<VersionRange, CatalogError> {
    Ok(VersionRange::parse(min, Some(max))?)
}
