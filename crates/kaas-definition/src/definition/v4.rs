//! v4 cluster definitions: a flat list of worker groups

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{de, ScalingDefinition};

/// A v4 cluster definition
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ClusterDefinitionV4 {
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
    /// Number of availability zones to spread workers over
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<i64>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub scaling: ScalingDefinition,
    #[serde(
        default,
        deserialize_with = "de::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub workers: Vec<NodeDefinition>,
}

/// One worker group. Only the first group of a definition is submitted.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct NodeDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageDefinition>,
    #[serde(
        default,
        deserialize_with = "de::lenient_labels",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsWorkerDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureWorkerDefinition>,
}

impl NodeDefinition {
    pub fn cpu_cores(&self) -> Option<i64> {
        self.cpu.as_ref().and_then(|c| c.cores)
    }

    pub fn memory_size_gb(&self) -> Option<f64> {
        self.memory.as_ref().and_then(|m| m.size_gb)
    }

    pub fn storage_size_gb(&self) -> Option<f64> {
        self.storage.as_ref().and_then(|s| s.size_gb)
    }

    /// The AWS instance type, if one is named
    pub fn aws_instance_type(&self) -> Option<&str> {
        self.aws
            .as_ref()
            .map(|a| a.instance_type.as_str())
            .filter(|s| !s.is_empty())
    }

    /// The Azure VM size, if one is named
    pub fn azure_vm_size(&self) -> Option<&str> {
        self.azure
            .as_ref()
            .map(|a| a.vm_size.as_str())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CpuDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct MemoryDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct StorageDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AwsWorkerDefinition {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub instance_type: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AzureWorkerDefinition {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub vm_size: String,
}
