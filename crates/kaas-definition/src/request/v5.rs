//! v5 wire bodies

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::v4::non_empty;
use crate::definition::{
    AwsNodeSpec, AzureNodeSpec, ClusterDefinitionV5, MasterNodes, NodePoolDefinition,
};

/// Body of `POST /v5/clusters/`
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AddClusterRequestV5 {
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<MasterRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_nodes: Option<MasterNodesRequest>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MasterRequest {
    pub availability_zone: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MasterNodesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_availability: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability_zones: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<MasterNodesAzureRequest>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MasterNodesAzureRequest {
    pub availability_zones_unspecified: bool,
}

/// Body of `POST /v5/clusters/{id}/nodepools/`.
///
/// Every field is sent only when set. The default value serializes to `{}`
/// and asks for a node pool with installation defaults.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AddNodePoolRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<AvailabilityZonesRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<NodePoolScalingRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_spec: Option<NodeSpecRequest>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AvailabilityZonesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct NodePoolScalingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct NodeSpecRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsNodeSpecRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureNodeSpecRequest>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AwsNodeSpecRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_distribution: Option<InstanceDistributionRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_alike_instance_types: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct InstanceDistributionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_demand_base_capacity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_demand_percentage_above_base_capacity: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AzureNodeSpecRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_instances: Option<AzureSpotInstancesRequest>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AzureSpotInstancesRequest {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

/// Body of `PUT /v5/clusters/{id}/labels/`. A `null` value removes a label.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SetClusterLabelsRequest {
    pub labels: BTreeMap<String, Option<String>>,
}

impl From<&ClusterDefinitionV5> for AddClusterRequestV5 {
    fn from(def: &ClusterDefinitionV5) -> Self {
        let master = def.master.as_ref().map(|m| MasterRequest {
            availability_zone: m.availability_zone.clone(),
        });
        let master_nodes = match (&def.master, &def.master_nodes) {
            (_, Some(nodes)) => Some(MasterNodesRequest::from(nodes)),
            (Some(_), None) => None,
            (None, None) => Some(MasterNodesRequest {
                azure: Some(MasterNodesAzureRequest {
                    availability_zones_unspecified: true,
                }),
                ..Default::default()
            }),
        };
        Self {
            owner: def.owner.clone(),
            name: non_empty(&def.name),
            release_version: non_empty(&def.release_version),
            master,
            master_nodes,
        }
    }
}

impl From<&MasterNodes> for MasterNodesRequest {
    fn from(nodes: &MasterNodes) -> Self {
        Self {
            high_availability: nodes.high_availability,
            availability_zones: nodes.availability_zones.clone(),
            azure: nodes.azure.as_ref().map(|a| MasterNodesAzureRequest {
                availability_zones_unspecified: a.availability_zones_unspecified,
            }),
        }
    }
}

impl From<&NodePoolDefinition> for AddNodePoolRequest {
    fn from(pool: &NodePoolDefinition) -> Self {
        Self {
            name: non_empty(&pool.name),
            availability_zones: pool.availability_zones.as_ref().map(|az| {
                AvailabilityZonesRequest {
                    number: az.number,
                    zones: (!az.zones.is_empty()).then(|| az.zones.clone()),
                }
            }),
            scaling: pool.scaling.as_ref().map(|s| NodePoolScalingRequest {
                min: s.min,
                max: s.max,
            }),
            node_spec: pool.node_spec.as_ref().map(|spec| NodeSpecRequest {
                aws: spec.aws.as_ref().map(AwsNodeSpecRequest::from),
                azure: spec.azure.as_ref().map(AzureNodeSpecRequest::from),
            }),
        }
    }
}

impl From<&AwsNodeSpec> for AwsNodeSpecRequest {
    fn from(aws: &AwsNodeSpec) -> Self {
        Self {
            instance_type: non_empty(&aws.instance_type),
            instance_distribution: aws.instance_distribution.as_ref().map(|d| {
                InstanceDistributionRequest {
                    on_demand_base_capacity: d.on_demand_base_capacity,
                    on_demand_percentage_above_base_capacity: d
                        .on_demand_percentage_above_base_capacity,
                }
            }),
            use_alike_instance_types: aws.use_alike_instance_types,
        }
    }
}

impl From<&AzureNodeSpec> for AzureNodeSpecRequest {
    fn from(azure: &AzureNodeSpec) -> Self {
        Self {
            vm_size: non_empty(&azure.vm_size),
            spot_instances: azure
                .spot_instances
                .as_ref()
                .map(|s| AzureSpotInstancesRequest {
                    enabled: s.enabled,
                    max_price: s.max_price,
                }),
        }
    }
}
