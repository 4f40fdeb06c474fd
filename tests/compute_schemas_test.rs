//! Tests for the compute API schemas as registered in the catalog.

use schemagate::microversion::ApiVersion;
use schemagate::{compute, SchemaCatalog, SchemaRole, ValidatorConfig};
use serde_json::{json, Value};

fn catalog() -> SchemaCatalog {
    compute::catalog(&ValidatorConfig::default()).unwrap()
}

fn v(s: &str) -> ApiVersion {
    s.parse().unwrap()
}

#[test]
fn test_catalog_registers_every_resource() {
    let catalog = catalog();
    for operation in [
        "server_metadata.create",
        "volumes.create",
        "snapshots.index",
        "server_tags.update_all",
        "migrate_server.migrate_live",
        "floating_ips.add",
        "security_groups.create",
        "admin_actions.reset_state",
        "server_password.index",
    ] {
        assert!(
            catalog.operations().iter().any(|name| name == operation),
            "missing {operation}"
        );
    }
    assert!(catalog.contains("volumes.index", SchemaRole::Query));
    assert!(!catalog.contains("volumes.index", SchemaRole::Body));
}

#[test]
fn test_volume_size_as_string() {
    let catalog = catalog();
    let ok = json!({"volume": {"size": "10", "display_name": "data"}});
    assert!(catalog.validate_body("volumes.create", v("2.1"), &ok, false).is_ok());

    let err = catalog
        .validate_body("volumes.create", v("2.1"), &json!({"volume": {"size": "0"}}), false)
        .unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute size. Value: 0. 0 is less than the minimum of 1"
    );

    let err = catalog
        .validate_body("volumes.create", v("2.1"), &json!({"volume": {}}), false)
        .unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute volume. Value: {}. 'size' is a required property"
    );
}

#[test]
fn test_first_error_follows_schema_order() {
    let catalog = catalog();

    let err = catalog
        .validate_body("volumes.create", v("2.1"), &json!({"volume": {"foo": 1}}), false)
        .unwrap_err();
    assert_eq!(
        err.detail(),
        concat!(
            r#"Invalid input for field/attribute volume. Value: {"foo":1}. "#,
            "'size' is a required property"
        )
    );

    let body = json!({"volume": {"size": 0, "volume_type": 5}});
    let err = catalog
        .validate_body("volumes.create", v("2.1"), &body, false)
        .unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute volume_type. Value: 5. 5 is not of type 'string'"
    );
}

#[test]
fn test_metadata_update_takes_one_key() {
    let catalog = catalog();
    let op = "server_metadata.update";

    assert!(catalog
        .validate_body(op, v("2.1"), &json!({"meta": {"role": "db"}}), false)
        .is_ok());
    assert!(catalog
        .validate_body(op, v("2.1"), &json!({"meta": {}}), false)
        .is_err());

    let err = catalog
        .validate_body(op, v("2.1"), &json!({"meta": {"a": "1", "b": "2"}}), false)
        .unwrap_err();
    assert_eq!(
        err.detail(),
        concat!(
            r#"Invalid input for field/attribute meta. Value: {"a":"1","b":"2"}. "#,
            r#"{"a":"1","b":"2"} has too many properties"#
        )
    );
}

#[test]
fn test_metadata_key_pattern() {
    let catalog = catalog();
    let err = catalog
        .validate_body(
            "server_metadata.create",
            v("2.1"),
            &json!({"metadata": {"bad/key": "v"}}),
            false,
        )
        .unwrap_err();
    assert!(err.detail().contains("'bad/key'"), "{}", err.detail());
}

fn tags(count: usize) -> Value {
    let tags: Vec<Value> = (0..count).map(|i| json!(format!("tag-{i}"))).collect();
    json!({"tags": tags})
}

#[test]
fn test_tag_limit() {
    let catalog = catalog();
    let op = "server_tags.update_all";

    assert!(catalog.validate_body(op, v("2.26"), &tags(50), false).is_ok());
    let err = catalog
        .validate_body(op, v("2.26"), &tags(51), false)
        .unwrap_err();
    assert!(err.detail().ends_with("is too long"), "{}", err.detail());
    assert_eq!(err.violation().keyword(), Some("maxItems"));
}

#[test]
fn test_tags_unavailable_before_2_26() {
    let catalog = catalog();
    assert!(catalog
        .get("server_tags.update_all", SchemaRole::Body, v("2.25"))
        .is_none());
    assert!(catalog
        .get("server_tags.update_all", SchemaRole::Body, v("2.26"))
        .is_some());
}

#[test]
fn test_migrate_live_bands() {
    let catalog = catalog();
    let op = "migrate_server.migrate_live";
    let original = json!({"os-migrateLive": {
        "block_migration": false,
        "disk_over_commit": false,
        "host": "compute-2"
    }});
    let auto = json!({"os-migrateLive": {"block_migration": "auto", "host": null}});
    let forced = json!({"os-migrateLive": {
        "block_migration": "auto",
        "host": "compute-2",
        "force": true
    }});

    assert!(catalog.validate_body(op, v("2.1"), &original, false).is_ok());
    assert!(catalog.validate_body(op, v("2.24"), &auto, false).is_err());

    assert!(catalog.validate_body(op, v("2.25"), &auto, false).is_ok());
    assert!(catalog.validate_body(op, v("2.25"), &original, false).is_err());
    assert!(catalog.validate_body(op, v("2.29"), &forced, false).is_err());

    assert!(catalog.validate_body(op, v("2.30"), &forced, false).is_ok());
    assert!(catalog.validate_body(op, v("2.67"), &forced, false).is_ok());

    let err = catalog
        .validate_body(op, v("2.68"), &forced, false)
        .unwrap_err();
    assert!(
        err.detail()
            .ends_with("Additional properties are not allowed ('force' was unexpected)"),
        "{}",
        err.detail()
    );
    assert!(catalog.validate_body(op, v("2.68"), &auto, false).is_ok());
}

#[test]
fn test_legacy_request_drops_removed_field() {
    let catalog = catalog();
    let forced = json!({"os-migrateLive": {
        "block_migration": "auto",
        "host": "compute-2",
        "force": true
    }});
    let accepted = catalog
        .validate_body("migrate_server.migrate_live", v("2.68"), &forced, true)
        .unwrap();
    assert_eq!(
        accepted,
        json!({"os-migrateLive": {"block_migration": "auto", "host": "compute-2"}})
    );
}

#[test]
fn test_snapshot_query_tightens_at_2_75() {
    let catalog = catalog();
    let pairs = [("limit", "5"), ("sort_dir", "asc")];

    for op in ["snapshots.index", "snapshots.detail"] {
        let params = catalog.validate_query(op, v("2.74"), pairs).unwrap();
        assert_eq!(params, json!({"limit": ["5"]}));

        let err = catalog.validate_query(op, v("2.75"), pairs).unwrap_err();
        assert_eq!(
            err.detail(),
            "Additional properties are not allowed ('sort_dir' was unexpected)"
        );
        assert!(catalog.validate_query(op, v("2.75"), [("limit", "5")]).is_ok());
    }
}

#[test]
fn test_paging_parameters_checked() {
    let catalog = catalog();
    let err = catalog
        .validate_query("volumes.index", v("2.1"), [("offset", "-1")])
        .unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for query parameters offset. Value: -1. '-1' does not match '^[0-9]*$'"
    );
}

#[test]
fn test_show_query_drops_everything() {
    let catalog = catalog();
    let params = catalog
        .validate_query("volumes.show", v("2.1"), [("foo", "bar")])
        .unwrap();
    assert_eq!(params, json!({}));
}

#[test]
fn test_metadata_responses() {
    let strict = ValidatorConfig::default()
        .with_response_validation(schemagate::ResponseValidation::Error);
    let catalog = compute::catalog(&strict).unwrap();

    assert!(catalog
        .validate_response("server_metadata.index", v("2.1"), &json!({"metadata": {"k": "v"}}))
        .is_ok());
    assert!(catalog
        .validate_response(
            "server_metadata.show",
            v("2.1"),
            &json!({"meta": {"k": "v", "x": "y"}})
        )
        .is_err());
    assert!(catalog
        .validate_response("server_metadata.delete", v("2.1"), &Value::Null)
        .is_ok());
}

#[test]
fn test_floating_ip_addresses() {
    let catalog = catalog();
    let op = "floating_ips.add";

    let body = json!({"addFloatingIp": {"address": "172.24.4.3", "fixed_address": "fd00::3"}});
    assert!(catalog.validate_body(op, v("2.1"), &body, false).is_ok());

    let err = catalog
        .validate_body(op, v("2.1"), &json!({"addFloatingIp": {"address": "host-1"}}), false)
        .unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute address. Value: host-1. \
         'host-1' is not valid under any of the given schemas"
    );

    let err = catalog
        .validate_body("floating_ips.remove", v("2.1"), &json!({"removeFloatingIp": {}}), false)
        .unwrap_err();
    assert!(err.detail().ends_with("'address' is a required property"), "{}", err.detail());

    assert!(catalog
        .validate_body("floating_ips.create", v("2.1"), &Value::Null, false)
        .is_ok());
    assert!(catalog
        .validate_body("floating_ips.create", v("2.1"), &json!({"pool": "public"}), false)
        .is_ok());
}

#[test]
fn test_floating_ip_response() {
    let strict = ValidatorConfig::default()
        .with_response_validation(schemagate::ResponseValidation::Error);
    let catalog = compute::catalog(&strict).unwrap();
    let floating_ip = json!({
        "fixed_ip": null,
        "id": "b6b9a6c3-5f5e-4a8e-9d38-0d1c5b2c4e11",
        "instance_id": null,
        "ip": "172.24.4.3",
        "pool": "public"
    });

    assert!(catalog
        .validate_response("floating_ips.show", v("2.1"), &json!({"floating_ip": floating_ip}))
        .is_ok());

    let mut bad = floating_ip.clone();
    bad["ip"] = json!("not-an-ip");
    assert!(catalog
        .validate_response("floating_ips.index", v("2.1"), &json!({"floating_ips": [bad]}))
        .is_err());
}

#[test]
fn test_security_groups_tolerate_extras() {
    let catalog = catalog();
    let body = json!({
        "security_group": {"name": "web", "description": "", "legacy": true},
        "extra": 1
    });
    let accepted = catalog
        .validate_body("security_groups.create", v("2.1"), &body, false)
        .unwrap();
    assert_eq!(accepted, body);

    let err = catalog
        .validate_body(
            "security_groups.update",
            v("2.1"),
            &json!({"security_group": {"name": "web"}}),
            false,
        )
        .unwrap_err();
    assert!(err.detail().ends_with("'description' is a required property"), "{}", err.detail());
}

#[test]
fn test_security_group_rule_checks_group_ids() {
    let catalog = catalog();
    let op = "security_group_rules.create";
    let parent = "5c1e0d4a-3f6b-4b8e-9a52-7f0c2d9e1a44";

    let rule = json!({"security_group_rule": {
        "parent_group_id": parent,
        "group_id": null,
        "ip_protocol": "tcp",
        "from_port": "22",
        "to_port": 22,
        "cidr": "anything goes"
    }});
    assert!(catalog.validate_body(op, v("2.1"), &rule, false).is_ok());

    let err = catalog
        .validate_body(
            op,
            v("2.1"),
            &json!({"security_group_rule": {"parent_group_id": "web"}}),
            false,
        )
        .unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute parent_group_id. Value: web. 'web' is not a 'uuid'"
    );
}

#[test]
fn test_server_security_group_actions() {
    let catalog = catalog();
    let op = "server_security_groups.add";

    assert!(catalog
        .validate_body(op, v("2.1"), &json!({"addSecurityGroup": {"name": "web"}}), false)
        .is_ok());
    let err = catalog
        .validate_body(op, v("2.1"), &json!({"addSecurityGroup": {"name": ""}}), false)
        .unwrap_err();
    assert_eq!(
        err.detail(),
        "Invalid input for field/attribute name. Value: . '' is too short"
    );
    assert!(catalog
        .validate_body(
            "server_security_groups.remove",
            v("2.1"),
            &json!({"removeSecurityGroup": {"name": "web", "junk": 1}}),
            false,
        )
        .is_err());
}

#[test]
fn test_security_group_index_paging() {
    let catalog = catalog();
    let params = catalog
        .validate_query(
            "security_groups.index",
            v("2.1"),
            [("limit", "10"), ("all_tenants", "1"), ("name", "web")],
        )
        .unwrap();
    assert_eq!(params, json!({"limit": ["10"], "all_tenants": ["1"]}));
}

#[test]
fn test_reset_state() {
    let catalog = catalog();
    let op = "admin_actions.reset_state";

    assert!(catalog
        .validate_body(op, v("2.1"), &json!({"os-resetState": {"state": "error"}}), false)
        .is_ok());
    let err = catalog
        .validate_body(op, v("2.1"), &json!({"os-resetState": {"state": "deleted"}}), false)
        .unwrap_err();
    assert_eq!(
        err.detail(),
        concat!(
            "Invalid input for field/attribute state. Value: deleted. ",
            r#"'deleted' is not one of ["active","error"]"#
        )
    );

    let inject = "admin_actions.inject_network_info";
    assert!(catalog
        .validate_body(inject, v("2.1"), &json!({"injectNetworkInfo": null}), false)
        .is_ok());
    assert!(catalog
        .validate_body(inject, v("2.1"), &json!({}), false)
        .is_err());
}

#[test]
fn test_server_password() {
    let strict = ValidatorConfig::default()
        .with_response_validation(schemagate::ResponseValidation::Error);
    let catalog = compute::catalog(&strict).unwrap();

    let params = catalog
        .validate_query("server_password.index", v("2.1"), [("foo", "bar")])
        .unwrap();
    assert_eq!(params, json!({}));
    assert!(catalog
        .validate_response("server_password.index", v("2.1"), &json!({"password": "xyz"}))
        .is_ok());
    assert!(catalog
        .validate_response("server_password.index", v("2.1"), &json!({}))
        .is_err());
    assert!(catalog
        .validate_response("server_password.clear", v("2.1"), &Value::Null)
        .is_ok());
}
