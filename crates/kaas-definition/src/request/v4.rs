//! v4 wire bodies

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::definition::{ClusterDefinitionV4, NodeDefinition};

/// Body of `POST /v4/clusters/`
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AddClusterRequestV4 {
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<ScalingRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workers: Vec<WorkerRequest>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ScalingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct WorkerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<SizeRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<SizeRequest>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsWorkerRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureWorkerRequest>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CpuRequest {
    pub cores: i64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SizeRequest {
    pub size_gb: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AwsWorkerRequest {
    pub instance_type: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AzureWorkerRequest {
    pub vm_size: String,
}

impl From<&ClusterDefinitionV4> for AddClusterRequestV4 {
    /// Only the first worker group is carried; the worker count comes from
    /// the scaling envelope.
    fn from(def: &ClusterDefinitionV4) -> Self {
        let scaling = def.scaling.min.map(|min| ScalingRequest {
            min: Some(min),
            max: def.scaling.max,
        });
        Self {
            owner: def.owner.clone(),
            name: non_empty(&def.name),
            release_version: non_empty(&def.release_version),
            availability_zones: def.availability_zones.filter(|n| *n != 0),
            scaling,
            workers: def.workers.first().map(WorkerRequest::from).into_iter().collect(),
        }
    }
}

impl From<&NodeDefinition> for WorkerRequest {
    fn from(node: &NodeDefinition) -> Self {
        Self {
            cpu: node.cpu_cores().map(|cores| CpuRequest { cores }),
            memory: node.memory_size_gb().map(|size_gb| SizeRequest { size_gb }),
            storage: node.storage_size_gb().map(|size_gb| SizeRequest { size_gb }),
            labels: node.labels.clone(),
            aws: node.aws_instance_type().map(|t| AwsWorkerRequest {
                instance_type: t.to_string(),
            }),
            azure: node.azure_vm_size().map(|s| AzureWorkerRequest {
                vm_size: s.to_string(),
            }),
        }
    }
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
