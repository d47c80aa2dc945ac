//! Merging command-line flags into a decoded definition
//!
//! Any flag that is given (non-empty, non-zero) overrides the value from the
//! definition file. Fields set by neither keep their zero value; whether that
//! is acceptable is decided by validation, not here.

use crate::arguments::Arguments;
use crate::definition::{
    AwsWorkerDefinition, AzureWorkerDefinition, ClusterDefinitionV4, ClusterDefinitionV5,
    CpuDefinition, Definition, MasterNodes, MemoryDefinition, NodeDefinition, ScalingDefinition,
    SchemaVersion, StorageDefinition, DEFAULT_WORKER_COUNT,
};

/// Merge `args` into `definition`, or into an empty definition of
/// `default_schema` when no file was given.
pub fn overlay(
    definition: Option<Definition>,
    args: &Arguments,
    default_schema: SchemaVersion,
) -> Definition {
    match definition.unwrap_or_else(|| Definition::empty(default_schema)) {
        Definition::V4(def) => Definition::V4(overlay_v4(def, args)),
        Definition::V5(def) => Definition::V5(overlay_v5(def, args)),
    }
}

/// Merge flags into a v4 definition
pub fn overlay_v4(mut def: ClusterDefinitionV4, args: &Arguments) -> ClusterDefinitionV4 {
    override_str(&mut def.name, args.cluster_name());
    override_str(&mut def.owner, args.owner());
    override_str(&mut def.release_version, args.release_version());

    if let Some(zones) = args.availability_zones() {
        def.availability_zones = Some(zones);
    }

    def.scaling = merge_scaling(&def.scaling, args);

    if args.has_worker_flags() {
        def.workers = vec![worker_from_flags(args)];
    }

    def
}

/// Merge flags into a v5 definition. Node pools and labels pass through.
pub fn overlay_v5(mut def: ClusterDefinitionV5, args: &Arguments) -> ClusterDefinitionV5 {
    override_str(&mut def.name, args.cluster_name());
    override_str(&mut def.owner, args.owner());
    override_str(&mut def.release_version, args.release_version());

    if let Some(ha) = args.master_ha {
        def.master_nodes
            .get_or_insert_with(MasterNodes::default)
            .high_availability = Some(ha);
    }

    def
}

fn override_str(field: &mut String, flag: Option<&str>) {
    if let Some(value) = flag {
        *field = value.to_string();
    }
}

/// Resolve the v4 scaling envelope from flags and file values.
///
/// A file value of zero counts as unset. A single bound is mirrored to the
/// other; with no bound at all the legacy worker count or the default applies.
fn merge_scaling(file: &ScalingDefinition, args: &Arguments) -> ScalingDefinition {
    let min = args.workers_min().or(file.min.filter(|v| *v != 0));
    let max = args.workers_max().or(file.max.filter(|v| *v != 0));

    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, min),
        (None, Some(max)) => (max, max),
        (None, None) => {
            let count = args.num_workers().unwrap_or(DEFAULT_WORKER_COUNT);
            (count, count)
        }
    };

    ScalingDefinition::new(min, max)
}

fn worker_from_flags(args: &Arguments) -> NodeDefinition {
    NodeDefinition {
        cpu: args
            .worker_num_cpus()
            .map(|cores| CpuDefinition { cores: Some(cores) }),
        memory: args
            .worker_memory_size_gb()
            .map(|size| MemoryDefinition { size_gb: Some(size) }),
        storage: args
            .worker_storage_size_gb()
            .map(|size| StorageDefinition { size_gb: Some(size) }),
        labels: Default::default(),
        aws: args
            .worker_aws_ec2_instance_type()
            .map(|t| AwsWorkerDefinition {
                instance_type: t.to_string(),
            }),
        azure: args.worker_azure_vm_size().map(|s| AzureWorkerDefinition {
            vm_size: s.to_string(),
        }),
    }
}
