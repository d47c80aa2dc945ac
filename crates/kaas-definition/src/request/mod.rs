//! Wire-format request bodies built from validated definitions
//!
//! Building is a pure transform: the same definition always produces the
//! same bodies, and maps are ordered so serialization is stable.

use serde::Serialize;

use crate::definition::Definition;
use crate::{Error, Result};

pub mod v4;
pub mod v5;

pub use v4::{
    AddClusterRequestV4, AwsWorkerRequest, AzureWorkerRequest, CpuRequest, ScalingRequest,
    SizeRequest, WorkerRequest,
};
pub use v5::{
    AddClusterRequestV5, AddNodePoolRequest, AvailabilityZonesRequest, AwsNodeSpecRequest,
    AzureNodeSpecRequest, AzureSpotInstancesRequest, InstanceDistributionRequest,
    MasterNodesAzureRequest, MasterNodesRequest, MasterRequest, NodePoolScalingRequest,
    NodeSpecRequest, SetClusterLabelsRequest,
};

/// Everything that will be sent to create a cluster
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ClusterRequest {
    V4(AddClusterRequestV4),
    V5 {
        cluster: AddClusterRequestV5,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        node_pools: Vec<AddNodePoolRequest>,
        #[serde(skip_serializing_if = "Option::is_none")]
        labels: Option<SetClusterLabelsRequest>,
    },
}

impl ClusterRequest {
    /// Serialize to the JSON sent over the wire
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::request_body(e.to_string()))
    }

    /// Render as YAML for previews
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::request_body(e.to_string()))
    }
}

/// Build the request bodies for a validated definition
pub fn build_request(def: &Definition) -> ClusterRequest {
    match def {
        Definition::V4(v4) => ClusterRequest::V4(AddClusterRequestV4::from(v4)),
        Definition::V5(v5) => ClusterRequest::V5 {
            cluster: AddClusterRequestV5::from(v5),
            node_pools: v5.nodepools.iter().map(AddNodePoolRequest::from).collect(),
            labels: (!v5.labels.is_empty()).then(|| SetClusterLabelsRequest {
                labels: v5.labels.clone(),
            }),
        },
    }
}

/// What a dry run would have submitted
#[derive(Clone, Debug, PartialEq)]
pub struct Preview {
    pub definition: Definition,
    pub request: ClusterRequest,
}

impl Preview {
    pub fn new(definition: Definition) -> Self {
        let request = build_request(&definition);
        Self {
            definition,
            request,
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        self.request.to_yaml()
    }
}
