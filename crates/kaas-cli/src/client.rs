//! HTTP implementation of [`ClusterApi`]

use std::time::Duration;

use async_trait::async_trait;
use kaas_definition::api::{
    ApiError, ClusterApi, CreatedCluster, CreatedNodePool, InstallationInfo, ReleaseInfo,
};
use kaas_definition::request::{
    AddClusterRequestV4, AddClusterRequestV5, AddNodePoolRequest, SetClusterLabelsRequest,
};
use kaas_definition::Provider;
use reqwest::header::{AUTHORIZATION, LOCATION};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Talks to the cluster API over HTTPS. Every call is made once, without retry.
pub struct RestClient {
    http: reqwest::Client,
    endpoint: String,
    authorization: Option<String>,
}

impl RestClient {
    pub fn new(
        endpoint: &str,
        scheme: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kaas/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            authorization: token.map(|t| format!("{scheme} {t}")),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.endpoint, path);
        debug!(%method, %url, "api request");
        let builder = self.http.request(method, url);
        match &self.authorization {
            Some(auth) => builder.header(AUTHORIZATION, auth),
            None => builder,
        }
    }

    async fn json<T: DeserializeOwned>(
        builder: RequestBuilder,
    ) -> std::result::Result<T, ApiError> {
        let response = send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

async fn send(builder: RequestBuilder) -> std::result::Result<Response, ApiError> {
    let response = builder
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!(%status, error = %e, "could not read error response body");
            String::new()
        }
    };
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);
    Err(ApiError::from_status(status.as_u16(), message))
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct InfoResponse {
    general: InfoGeneral,
    #[serde(default)]
    features: Option<InfoFeatures>,
}

#[derive(Deserialize)]
struct InfoGeneral {
    provider: String,
}

#[derive(Deserialize)]
struct InfoFeatures {
    #[serde(default)]
    nodepools: Option<InfoFeature>,
}

#[derive(Deserialize)]
struct InfoFeature {
    #[serde(default)]
    release_version_minimum: Option<String>,
}

impl TryFrom<InfoResponse> for InstallationInfo {
    type Error = ApiError;

    fn try_from(info: InfoResponse) -> std::result::Result<Self, ApiError> {
        let provider = info
            .general
            .provider
            .parse::<Provider>()
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(InstallationInfo {
            provider,
            node_pools_release_minimum: info
                .features
                .and_then(|f| f.nodepools)
                .and_then(|n| n.release_version_minimum),
        })
    }
}

#[derive(Deserialize)]
struct ReleaseResponse {
    version: String,
    #[serde(default)]
    active: bool,
}

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Deserialize)]
struct NodePoolResponse {
    id: String,
    #[serde(default)]
    name: String,
}

/// Extract the cluster ID from a `/v4/clusters/<id>/` location
fn cluster_id_from_location(location: &str) -> Option<String> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && *id != "clusters")
        .map(str::to_string)
}

#[async_trait]
impl ClusterApi for RestClient {
    async fn get_info(&self) -> std::result::Result<InstallationInfo, ApiError> {
        let info: InfoResponse = Self::json(self.request(Method::GET, "/v4/info/")).await?;
        info.try_into()
    }

    async fn list_releases(&self) -> std::result::Result<Vec<ReleaseInfo>, ApiError> {
        let releases: Vec<ReleaseResponse> =
            Self::json(self.request(Method::GET, "/v4/releases/")).await?;
        Ok(releases
            .into_iter()
            .map(|r| ReleaseInfo {
                version: r.version,
                active: r.active,
            })
            .collect())
    }

    async fn create_cluster_v4(
        &self,
        body: &AddClusterRequestV4,
    ) -> std::result::Result<CreatedCluster, ApiError> {
        let response = send(self.request(Method::POST, "/v4/clusters/").json(body)).await?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidResponse("missing Location header".to_string()))?;
        let id = cluster_id_from_location(&location).ok_or_else(|| {
            ApiError::InvalidResponse(format!("no cluster ID in location '{location}'"))
        })?;
        Ok(CreatedCluster {
            id,
            location: Some(location),
        })
    }

    async fn create_cluster_v5(
        &self,
        body: &AddClusterRequestV5,
    ) -> std::result::Result<String, ApiError> {
        let created: IdResponse =
            Self::json(self.request(Method::POST, "/v5/clusters/").json(body)).await?;
        Ok(created.id)
    }

    async fn create_node_pool(
        &self,
        cluster_id: &str,
        body: &AddNodePoolRequest,
    ) -> std::result::Result<CreatedNodePool, ApiError> {
        let path = format!("/v5/clusters/{cluster_id}/nodepools/");
        let created: NodePoolResponse =
            Self::json(self.request(Method::POST, &path).json(body)).await?;
        Ok(CreatedNodePool {
            id: created.id,
            name: created.name,
        })
    }

    async fn update_cluster_labels(
        &self,
        cluster_id: &str,
        body: &SetClusterLabelsRequest,
    ) -> std::result::Result<(), ApiError> {
        let path = format!("/v5/clusters/{cluster_id}/labels/");
        send(self.request(Method::PUT, &path).json(body)).await?;
        Ok(())
    }
}
