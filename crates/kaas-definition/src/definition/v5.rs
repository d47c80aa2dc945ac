//! v5 cluster definitions: a control plane plus node pools

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{de, ScalingDefinition};

/// A v5 cluster definition, recognized by its `api_version` key
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ClusterDefinitionV5 {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub api_version: String,
    #[serde(
        default,
        deserialize_with = "de::lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "de::lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub owner: String,
    #[serde(
        default,
        deserialize_with = "de::release_version",
        skip_serializing_if = "String::is_empty"
    )]
    pub release_version: String,
    /// Deprecated single control-plane node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<MasterDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_nodes: Option<MasterNodes>,
    #[serde(
        default,
        deserialize_with = "de::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub nodepools: Vec<NodePoolDefinition>,
    /// Cluster labels. A null value marks a label for removal.
    #[serde(
        default,
        deserialize_with = "de::lenient_optional_labels",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, Option<String>>,
}

impl ClusterDefinitionV5 {
    /// True if the definition requests high-availability masters
    pub fn wants_ha_masters(&self) -> bool {
        self.master_nodes
            .as_ref()
            .and_then(|m| m.high_availability)
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MasterDefinition {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub availability_zone: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MasterNodes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_availability: Option<bool>,
    #[serde(
        default,
        deserialize_with = "de::lenient_strings",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub availability_zones: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<MasterNodesAzure>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MasterNodesAzure {
    #[serde(default)]
    pub availability_zones_unspecified: bool,
}

/// One node pool of a v5 cluster
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct NodePoolDefinition {
    #[serde(
        default,
        deserialize_with = "de::lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<AvailabilityZonesDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<ScalingDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_spec: Option<NodeSpec>,
}

impl NodePoolDefinition {
    pub fn aws(&self) -> Option<&AwsNodeSpec> {
        self.node_spec.as_ref().and_then(|s| s.aws.as_ref())
    }

    pub fn azure(&self) -> Option<&AzureNodeSpec> {
        self.node_spec.as_ref().and_then(|s| s.azure.as_ref())
    }
}

/// Either a number of zones to pick or an explicit zone list
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AvailabilityZonesDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    #[serde(
        default,
        deserialize_with = "de::lenient_strings",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub zones: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct NodeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsNodeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureNodeSpec>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AwsNodeSpec {
    #[serde(
        default,
        deserialize_with = "de::lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub instance_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_distribution: Option<InstanceDistribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_alike_instance_types: Option<bool>,
}

/// Mix of on-demand and spot instances. Zero is a meaningful value here.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct InstanceDistribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_demand_base_capacity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_demand_percentage_above_base_capacity: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AzureNodeSpec {
    #[serde(
        default,
        deserialize_with = "de::lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub vm_size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_instances: Option<AzureSpotInstances>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AzureSpotInstances {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}
