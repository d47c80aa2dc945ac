//! The cluster API as seen by cluster creation
//!
//! [`ClusterApi`] is the seam between the creation workflow and the network.
//! Implementations classify transport and HTTP failures into [`ApiError`];
//! the workflow never retries.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::provider::Provider;
use crate::request::{
    AddClusterRequestV4, AddClusterRequestV5, AddNodePoolRequest, SetClusterLabelsRequest,
};

/// Failures reported by an API implementation
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("not authorized")]
    NotAuthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("could not reach the API: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Classify an unsuccessful HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => ApiError::NotAuthorized,
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            400 | 422 => ApiError::BadRequest(message),
            _ => ApiError::Server { status, message },
        }
    }
}

/// A v4 cluster accepted by the API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedCluster {
    pub id: String,
    /// Path of the new cluster resource
    pub location: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedNodePool {
    pub id: String,
    pub name: String,
}

/// Installation details published by the info endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallationInfo {
    pub provider: Provider,
    /// Lowest release with node pools, if the installation publishes one
    pub node_pools_release_minimum: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub version: String,
    pub active: bool,
}

/// Calls cluster creation makes against the API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Read installation details
    async fn get_info(&self) -> Result<InstallationInfo, ApiError>;

    /// List all releases of the installation
    async fn list_releases(&self) -> Result<Vec<ReleaseInfo>, ApiError>;

    async fn create_cluster_v4(
        &self,
        body: &AddClusterRequestV4,
    ) -> Result<CreatedCluster, ApiError>;

    /// Create a v5 cluster and return its ID
    async fn create_cluster_v5(&self, body: &AddClusterRequestV5) -> Result<String, ApiError>;

    async fn create_node_pool(
        &self,
        cluster_id: &str,
        body: &AddNodePoolRequest,
    ) -> Result<CreatedNodePool, ApiError>;

    async fn update_cluster_labels(
        &self,
        cluster_id: &str,
        body: &SetClusterLabelsRequest,
    ) -> Result<(), ApiError>;
}
