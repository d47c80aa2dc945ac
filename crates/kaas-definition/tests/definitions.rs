//! Definition files taken through decode, overlay, validation and request
//! building without any API calls.

use std::path::PathBuf;

use kaas_definition::capabilities::Capabilities;
use kaas_definition::definition::{ScalingDefinition, SchemaVersion};
use kaas_definition::overlay::overlay;
use kaas_definition::validate::validate;
use kaas_definition::{
    build_request, decode, read_definition, Arguments, ClusterRequest, Definition,
    DefinitionSource, Error, Installation, Provider, ValidationError,
};

fn testdata(name: &str) -> DefinitionSource {
    DefinitionSource::File(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/testdata")
            .join(name),
    )
}

fn args_for(name: &str) -> Arguments {
    Arguments {
        auth_token: Some("token".to_string()),
        input_yaml_file: Some(name.to_string()),
        ..Default::default()
    }
}

/// Decode, overlay and validate a fixture the way a creation would
fn resolve(
    name: &str,
    args: &Arguments,
    installation: &Installation,
) -> Result<Definition, Error> {
    let def = read_definition(&testdata(name))?;
    let merged = overlay(Some(def), args, SchemaVersion::V4);
    validate(&merged, args, installation)?;
    Ok(merged)
}

// =============================================================================
// Story: v4 definitions
// =============================================================================

#[test]
fn littleco_definition_has_two_worker_groups() {
    let def = read_definition(&testdata("v4_two_workers.yaml")).unwrap();
    let Definition::V4(def) = def else {
        panic!("expected a v4 definition");
    };
    assert_eq!(def.owner, "littleco");
    assert_eq!(def.workers.len(), 2);
    let second = &def.workers[1];
    assert_eq!(second.cpu_cores(), Some(2));
    assert_eq!(second.memory_size_gb(), Some(5.5));
    assert_eq!(second.storage_size_gb(), Some(13.0));
}

#[test]
fn littleco_definition_with_flat_memory_key() {
    // `size_gb` sits beside `memory`, not under it, so the first group has
    // no memory block and an ignored unknown key.
    let yaml = "owner: littleco\nworkers:\n  - memory:\n    size_gb: 2\n  - cpu:\n      cores: 2\n    memory:\n      size_gb: 5.5\n    storage:\n      size_gb: 13\n";
    let Definition::V4(def) = decode(yaml.as_bytes()).unwrap() else {
        panic!("expected a v4 definition");
    };
    assert_eq!(def.owner, "littleco");
    assert_eq!(def.workers.len(), 2);
    assert_eq!(def.workers[0].memory, None);
    let second = &def.workers[1];
    assert_eq!(second.cpu_cores(), Some(2));
    assert_eq!(second.memory_size_gb(), Some(5.5));
    assert_eq!(second.storage_size_gb(), Some(13.0));
}

#[test]
fn complete_v4_definition_builds_single_worker_request() {
    let args = args_for("v4_complete.yaml");
    let installation = Installation::new(Provider::Aws).with_release("8.5.0");
    let def = resolve("v4_complete.yaml", &args, &installation).unwrap();

    let ClusterRequest::V4(body) = build_request(&def) else {
        panic!("expected a v4 request");
    };
    assert_eq!(body.name.as_deref(), Some("Cluster Name from my YAML"));
    assert_eq!(body.availability_zones, Some(3));
    assert_eq!(body.workers.len(), 1);
    assert_eq!(body.workers[0].labels["nodepool"], "general");
}

#[test]
fn flags_override_v4_file_values() {
    let args = Arguments {
        cluster_name: Some("renamed".to_string()),
        workers_max: Some(9),
        ..args_for("v4_complete.yaml")
    };
    let installation = Installation::new(Provider::Aws).with_release("8.5.0");
    let Definition::V4(def) = resolve("v4_complete.yaml", &args, &installation).unwrap() else {
        panic!("expected a v4 definition");
    };
    assert_eq!(def.name, "renamed");
    assert_eq!(def.scaling, ScalingDefinition::new(3, 9));
}

#[test]
fn v4_file_on_node_pool_release_is_rejected() {
    let args = args_for("v4_complete.yaml");
    let installation = Installation::new(Provider::Aws).with_release("9.0.0");
    let err = resolve("v4_complete.yaml", &args, &installation).unwrap_err();
    assert!(matches!(
        err.validation_error(),
        Some(ValidationError::IncompatibleSettings { .. })
    ));
}

// =============================================================================
// Story: v5 definitions
// =============================================================================

#[test]
fn v5_definition_keeps_node_pool_details() {
    let args = args_for("v5_aws.yaml");
    let installation = Installation::new(Provider::Aws).with_release("11.5.0");
    let def = resolve("v5_aws.yaml", &args, &installation).unwrap();

    let ClusterRequest::V5 {
        cluster,
        node_pools,
        labels,
    } = build_request(&def)
    else {
        panic!("expected a v5 request");
    };
    assert_eq!(
        cluster.master_nodes.and_then(|m| m.high_availability),
        Some(true)
    );
    assert_eq!(node_pools.len(), 2);

    let spot = serde_json::to_value(&node_pools[1]).unwrap();
    assert_eq!(spot["availability_zones"]["zones"][1], "eu-central-1b");
    assert_eq!(spot["scaling"]["min"], 0);
    let distribution = &spot["node_spec"]["aws"]["instance_distribution"];
    assert_eq!(distribution["on_demand_base_capacity"], 0);
    assert_eq!(distribution["on_demand_percentage_above_base_capacity"], 0);

    let labels = serde_json::to_value(labels.unwrap()).unwrap();
    assert_eq!(labels["labels"]["team"], "platform");
    assert!(labels["labels"]["deprecated"].is_null());
}

#[test]
fn v5_request_is_stable_across_builds() {
    let args = args_for("v5_aws.yaml");
    let installation = Installation::new(Provider::Aws).with_release("11.5.0");
    let def = resolve("v5_aws.yaml", &args, &installation).unwrap();
    assert_eq!(
        build_request(&def).to_json().unwrap(),
        build_request(&def).to_json().unwrap()
    );
}

#[test]
fn conflicting_master_types_are_rejected() {
    let args = args_for("v5_conflicting_masters.yaml");
    let installation = Installation::new(Provider::Aws).with_release("11.5.0");
    let err = resolve("v5_conflicting_masters.yaml", &args, &installation).unwrap_err();
    assert_eq!(
        err.validation_error(),
        Some(&ValidationError::MustProvideSingleMasterType)
    );
}

#[test]
fn azure_numeric_zones_reach_the_request_as_strings() {
    let args = args_for("v5_azure.yaml");
    let capabilities = Capabilities::default()
        .with_node_pools_minimum(Provider::Azure, semver::Version::new(13, 0, 0));
    let installation = Installation::new(Provider::Azure)
        .with_release("13.0.0")
        .with_capabilities(capabilities);
    let def = resolve("v5_azure.yaml", &args, &installation).unwrap();

    let ClusterRequest::V5 {
        cluster,
        node_pools,
        ..
    } = build_request(&def)
    else {
        panic!("expected a v5 request");
    };
    assert_eq!(cluster.master.unwrap().availability_zone, "2");
    let zones = node_pools[0]
        .availability_zones
        .as_ref()
        .and_then(|az| az.zones.clone())
        .unwrap();
    assert_eq!(zones, vec!["1", "2", "3"]);
}

// =============================================================================
// Story: broken input
// =============================================================================

#[test]
fn list_document_is_a_decode_error() {
    let err = read_definition(&testdata("not_a_map.yaml")).unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn owner_is_required_without_a_file() {
    let args = Arguments {
        auth_token: Some("token".to_string()),
        owner: Some(String::new()),
        ..Default::default()
    };
    let installation = Installation::new(Provider::Aws).with_release("8.5.0");
    let def = overlay(None, &args, SchemaVersion::V4);
    assert_eq!(
        validate(&def, &args, &installation),
        Err(ValidationError::ClusterOwnerMissing)
    );
}
