//! Validation of merged definitions
//!
//! [`validate`] is a pure check over the merged definition, the raw
//! arguments and the target installation. Rules run in a fixed order and the
//! first failing rule is returned.

use crate::arguments::Arguments;
use crate::definition::{ClusterDefinitionV4, ClusterDefinitionV5, Definition, NodePoolDefinition};
use crate::error::ValidationError;
use crate::installation::Installation;
use crate::provider::Provider;

type Result = std::result::Result<(), ValidationError>;

/// Check a merged definition. Makes no network calls.
pub fn validate(def: &Definition, args: &Arguments, installation: &Installation) -> Result {
    validate_arguments(args)?;
    validate_scaling(def)?;
    if let Definition::V4(v4) = def {
        validate_minimums(v4, installation)?;
    }
    validate_compatibility(def, args, installation)?;
    if def.owner().is_empty() {
        return Err(ValidationError::ClusterOwnerMissing);
    }
    if let Definition::V5(v5) = def {
        validate_masters(v5, installation)?;
        for pool in &v5.nodepools {
            validate_node_pool(pool)?;
        }
    }
    Ok(())
}

/// The rules that depend on the flags alone, in the same order
/// [`validate`] applies them. Needs no definition or installation.
pub fn validate_arguments(args: &Arguments) -> Result {
    if !args.is_logged_in() {
        return Err(ValidationError::NotLoggedIn);
    }
    validate_flag_conflicts(args)?;
    if let (Some(min), Some(max)) = (args.workers_min(), args.workers_max()) {
        if min > max {
            return Err(ValidationError::WorkersMinMaxInvalid { min, max });
        }
    }
    Ok(())
}

fn validate_flag_conflicts(args: &Arguments) -> Result {
    if args.input_file().is_some() {
        let conflicting = [
            ("--num-workers", args.num_workers().is_some()),
            ("--num-cpus", args.worker_num_cpus().is_some()),
            ("--memory-gb", args.worker_memory_size_gb().is_some()),
            ("--storage-gb", args.worker_storage_size_gb().is_some()),
            (
                "--aws-instance-type",
                args.worker_aws_ec2_instance_type().is_some(),
            ),
            ("--azure-vm-size", args.worker_azure_vm_size().is_some()),
        ]
        .into_iter()
        .filter(|(_, given)| *given)
        .map(|(flag, _)| flag)
        .collect::<Vec<_>>();

        if !conflicting.is_empty() {
            return Err(ValidationError::conflicting_flags(format!(
                "a definition file cannot be combined with {}",
                conflicting.join(", ")
            )));
        }
    }

    if args.num_workers().is_some()
        && (args.workers_min().is_some() || args.workers_max().is_some())
    {
        return Err(ValidationError::ConflictingWorkerFlagsUsed);
    }
    Ok(())
}

fn validate_scaling(def: &Definition) -> Result {
    let inverted = match def {
        Definition::V4(v4) => v4.scaling.inverted(),
        Definition::V5(v5) => v5
            .nodepools
            .iter()
            .filter_map(|p| p.scaling.as_ref())
            .find_map(|s| s.inverted()),
    };
    match inverted {
        Some((min, max)) => Err(ValidationError::WorkersMinMaxInvalid { min, max }),
        None => Ok(()),
    }
}

fn validate_minimums(def: &ClusterDefinitionV4, installation: &Installation) -> Result {
    let limits = &installation.limits;

    let too_few = |n: Option<i64>| n.is_some_and(|n| n < limits.min_workers);
    if too_few(def.scaling.min) || too_few(def.scaling.max) {
        return Err(ValidationError::NotEnoughWorkerNodes {
            minimum: limits.min_workers,
        });
    }

    for worker in &def.workers {
        if worker
            .cpu_cores()
            .is_some_and(|c| c < limits.min_worker_cpu_cores)
        {
            return Err(ValidationError::NotEnoughCpuCoresPerWorker {
                minimum: limits.min_worker_cpu_cores,
            });
        }
        if worker
            .memory_size_gb()
            .is_some_and(|m| m < limits.min_worker_memory_size_gb)
        {
            return Err(ValidationError::NotEnoughMemoryPerWorker {
                minimum: limits.min_worker_memory_size_gb,
            });
        }
        if worker
            .storage_size_gb()
            .is_some_and(|s| s < limits.min_worker_storage_size_gb)
        {
            return Err(ValidationError::NotEnoughStoragePerWorker {
                minimum: limits.min_worker_storage_size_gb,
            });
        }
    }
    Ok(())
}

fn validate_compatibility(def: &Definition, args: &Arguments, installation: &Installation) -> Result {
    let provider = installation.provider;

    if args.has_machine_type_flags() && args.has_resource_flags() {
        return Err(ValidationError::incompatible(
            "an instance type or VM size cannot be combined with CPU, memory or storage flags",
        ));
    }
    if args.worker_aws_ec2_instance_type().is_some() && provider != Provider::Aws {
        return Err(ValidationError::incompatible(format!(
            "--aws-instance-type cannot be used on {provider}"
        )));
    }
    if args.worker_azure_vm_size().is_some() && provider != Provider::Azure {
        return Err(ValidationError::incompatible(format!(
            "--azure-vm-size cannot be used on {provider}"
        )));
    }
    if args.has_resource_flags() && provider.is_cloud() {
        return Err(ValidationError::incompatible(format!(
            "CPU, memory and storage flags cannot be used on {provider}, use an instance type or VM size"
        )));
    }

    match def {
        Definition::V4(v4) => {
            for worker in &v4.workers {
                if worker.aws_instance_type().is_some() && provider != Provider::Aws {
                    return Err(provider_mismatch("aws", provider));
                }
                if worker.azure_vm_size().is_some() && provider != Provider::Azure {
                    return Err(provider_mismatch("azure", provider));
                }
            }
            if v4.availability_zones.is_some() && !installation.supports_availability_zones() {
                return Err(ValidationError::incompatible(format!(
                    "availability zones cannot be chosen for release {} on {provider}",
                    v4.release_version
                )));
            }
            if v4.scaling.min != v4.scaling.max && !installation.supports_autoscaling() {
                return Err(ValidationError::incompatible(format!(
                    "release {} on {provider} has no autoscaling, minimum and maximum workers must be equal",
                    v4.release_version
                )));
            }
            if installation.supports_node_pools() {
                return Err(ValidationError::incompatible(format!(
                    "release {} uses node pools, a v4 definition cannot be used",
                    v4.release_version
                )));
            }
        }
        Definition::V5(v5) => {
            if args.has_worker_flags()
                || args.num_workers().is_some()
                || args.workers_min().is_some()
                || args.workers_max().is_some()
            {
                return Err(ValidationError::incompatible(
                    "worker flags cannot be used for clusters with node pools",
                ));
            }
            if args.availability_zones().is_some() {
                return Err(ValidationError::incompatible(
                    "--availability-zones cannot be used for clusters with node pools, set them per node pool",
                ));
            }
            for pool in &v5.nodepools {
                if pool.aws().is_some() && provider != Provider::Aws {
                    return Err(provider_mismatch("aws", provider));
                }
                if pool.azure().is_some() && provider != Provider::Azure {
                    return Err(provider_mismatch("azure", provider));
                }
            }
            if installation.release.is_some() && !installation.supports_node_pools() {
                return Err(ValidationError::incompatible(format!(
                    "node pools are not supported by release {} on {provider}",
                    v5.release_version
                )));
            }
        }
    }
    Ok(())
}

fn provider_mismatch(section: &str, provider: Provider) -> ValidationError {
    ValidationError::incompatible(format!(
        "'{section}' settings cannot be used on a {provider} installation"
    ))
}

fn validate_masters(def: &ClusterDefinitionV5, installation: &Installation) -> Result {
    if def.master.is_some() && def.master_nodes.is_some() {
        return Err(ValidationError::MustProvideSingleMasterType);
    }
    if def.wants_ha_masters() && !installation.supports_ha_masters() {
        return Err(ValidationError::HaMastersNotSupported);
    }
    Ok(())
}

fn validate_node_pool(pool: &NodePoolDefinition) -> Result {
    if let Some(az) = &pool.availability_zones {
        if (az.number.is_some() && !az.zones.is_empty()) || az.number.is_some_and(|n| n < 0) {
            return Err(ValidationError::InvalidAvailabilityZones {
                node_pool: pool.name.clone(),
            });
        }
    }

    if let Some(dist) = pool.aws().and_then(|a| a.instance_distribution.as_ref()) {
        let bad_base = dist.on_demand_base_capacity.is_some_and(|b| b < 0);
        let bad_percentage = dist
            .on_demand_percentage_above_base_capacity
            .is_some_and(|p| !(0..=100).contains(&p));
        if bad_base || bad_percentage {
            return Err(ValidationError::NotPercentage {
                node_pool: pool.name.clone(),
            });
        }
    }

    if let Some(spot) = pool.azure().and_then(|a| a.spot_instances.as_ref()) {
        if spot.max_price.is_some() && !spot.enabled {
            return Err(ValidationError::SpotMaxPriceWithoutSpotInstances {
                node_pool: pool.name.clone(),
            });
        }
    }
    Ok(())
}
