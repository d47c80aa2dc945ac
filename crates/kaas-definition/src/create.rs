//! Cluster creation workflow
//!
//! Runs decode, flag checks, resolve, overlay, validate, build and submit in
//! that order. Errors in the flags alone are reported before any API call,
//! and nothing is created unless validation passes. Once the cluster exists, a
//! failing node pool or label step is recorded and the remaining steps still
//! run, so callers get the cluster ID together with the list of failures.

use tracing::{debug, info, warn};

use crate::api::{ApiError, ClusterApi, ReleaseInfo};
use crate::arguments::Arguments;
use crate::capabilities::{parse_release_version, Capabilities};
use crate::decode::{read_definition, DefinitionSource};
use crate::definition::{ClusterDefinitionV5, Definition, MasterNodes, SchemaVersion};
use crate::installation::Installation;
use crate::limits::Limits;
use crate::overlay::overlay;
use crate::request::{build_request, AddNodePoolRequest, ClusterRequest, Preview};
use crate::validate::{validate, validate_arguments};
use crate::{Error, Result};

/// A non-fatal step that ran after the cluster was created
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubStep {
    NodePool { index: usize, name: String },
    DefaultNodePool,
    Labels,
}

impl std::fmt::Display for SubStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubStep::NodePool { index, name } if name.is_empty() => {
                write!(f, "node pool #{}", index + 1)
            }
            SubStep::NodePool { name, .. } => write!(f, "node pool '{name}'"),
            SubStep::DefaultNodePool => write!(f, "default node pool"),
            SubStep::Labels => write!(f, "cluster labels"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubStepFailure {
    pub step: SubStep,
    pub error: ApiError,
}

/// A cluster that was created, possibly with failed follow-up steps
#[derive(Clone, Debug, PartialEq)]
pub struct CreationResult {
    pub id: String,
    /// Resource path reported for v4 clusters
    pub location: Option<String>,
    pub definition: Definition,
    pub failures: Vec<SubStepFailure>,
}

impl CreationResult {
    /// True if any step after cluster creation failed
    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CreationOutcome {
    Created(CreationResult),
    DryRun(Preview),
}

/// Creates clusters through a [`ClusterApi`]
pub struct ClusterCreator<'a, A: ClusterApi + ?Sized> {
    api: &'a A,
    limits: Limits,
}

impl<'a, A: ClusterApi + ?Sized> ClusterCreator<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            limits: Limits::default(),
        }
    }

    /// Use installation-specific worker minimums
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Resolve, validate and, unless this is a dry run, create the cluster
    pub async fn create(&self, args: &Arguments) -> Result<CreationOutcome> {
        let file_definition = match args.input_file() {
            Some(path) => Some(read_definition(&DefinitionSource::from_flag(path))?),
            None => None,
        };

        validate_arguments(args)?;

        let (installation, release) = self.resolve(file_definition.as_ref(), args).await?;
        let default_schema = if installation.supports_node_pools() {
            SchemaVersion::V5
        } else {
            SchemaVersion::V4
        };

        let mut definition = overlay(file_definition, args, default_schema);
        if definition.release_version().is_empty() {
            definition.set_release_version(release);
        }
        if let Definition::V5(v5) = &mut definition {
            apply_master_defaults(v5, &installation);
        }

        validate(&definition, args, &installation)?;

        if args.dry_run {
            info!(
                schema = %definition.schema_version(),
                "dry run, not creating cluster"
            );
            return Ok(CreationOutcome::DryRun(Preview::new(definition)));
        }

        let request = build_request(&definition);
        debug!(body = %request.to_json()?, "cluster request built");

        let result = match request {
            ClusterRequest::V4(body) => {
                if let Definition::V4(v4) = &definition {
                    if v4.workers.len() > 1 {
                        warn!(
                            groups = v4.workers.len(),
                            "only the first worker group is used for v4 clusters"
                        );
                    }
                }
                let created = self.api.create_cluster_v4(&body).await?;
                info!(id = %created.id, "cluster created");
                CreationResult {
                    id: created.id,
                    location: created.location,
                    definition,
                    failures: Vec::new(),
                }
            }
            ClusterRequest::V5 {
                cluster,
                node_pools,
                labels,
            } => {
                let id = self.api.create_cluster_v5(&cluster).await?;
                info!(id = %id, "cluster created");
                let mut failures = Vec::new();

                if node_pools.is_empty() {
                    if args.create_default_node_pool {
                        let body = AddNodePoolRequest::default();
                        self.record(
                            &mut failures,
                            SubStep::DefaultNodePool,
                            self.api.create_node_pool(&id, &body).await.map(|_| ()),
                        );
                    }
                } else {
                    for (index, body) in node_pools.iter().enumerate() {
                        let step = SubStep::NodePool {
                            index,
                            name: body.name.clone().unwrap_or_default(),
                        };
                        let outcome = self.api.create_node_pool(&id, body).await;
                        if let Ok(pool) = &outcome {
                            info!(cluster = %id, node_pool = %pool.id, "node pool created");
                        }
                        self.record(&mut failures, step, outcome.map(|_| ()));
                    }
                }

                if let Some(labels) = &labels {
                    self.record(
                        &mut failures,
                        SubStep::Labels,
                        self.api.update_cluster_labels(&id, labels).await,
                    );
                }

                CreationResult {
                    id,
                    location: None,
                    definition,
                    failures,
                }
            }
        };

        Ok(CreationOutcome::Created(result))
    }

    /// Look up the provider and the release the cluster will use. Only
    /// read-only calls are made here.
    async fn resolve(
        &self,
        file_definition: Option<&Definition>,
        args: &Arguments,
    ) -> Result<(Installation, String)> {
        let info = self.api.get_info().await?;
        debug!(provider = %info.provider, "installation info received");

        let release = match args
            .release_version()
            .or_else(|| file_definition.map(Definition::release_version))
            .filter(|r| !r.is_empty())
        {
            Some(release) => release.to_string(),
            None => {
                let releases = self.api.list_releases().await?;
                let latest = latest_active_release(&releases).ok_or(Error::NoActiveRelease)?;
                info!(release = %latest, "using latest active release");
                latest
            }
        };

        let mut capabilities = Capabilities::default();
        if let Some(minimum) = info
            .node_pools_release_minimum
            .as_deref()
            .and_then(parse_release_version)
        {
            capabilities = capabilities.with_node_pools_minimum(info.provider, minimum);
        }

        let installation = Installation::new(info.provider)
            .with_release(&release)
            .with_capabilities(capabilities)
            .with_limits(self.limits.clone());
        debug!(
            release = %release,
            capabilities = ?installation.supported_capabilities(),
            "installation resolved"
        );
        Ok((installation, release))
    }

    fn record(
        &self,
        failures: &mut Vec<SubStepFailure>,
        step: SubStep,
        outcome: std::result::Result<(), ApiError>,
    ) {
        if let Err(error) = outcome {
            warn!(step = %step, error = %error, "cluster created, but a follow-up step failed");
            failures.push(SubStepFailure { step, error });
        }
    }
}

/// Default to HA masters where supported, and warn about the deprecated
/// single `master` block.
fn apply_master_defaults(def: &mut ClusterDefinitionV5, installation: &Installation) {
    if !installation.supports_ha_masters() {
        return;
    }
    if def.master.is_some() {
        warn!("'master' is deprecated, use 'master_nodes.high_availability' instead");
    } else if def.master_nodes.is_none() {
        def.master_nodes = Some(MasterNodes {
            high_availability: Some(true),
            ..Default::default()
        });
    }
}

/// Highest active release by semantic version
pub fn latest_active_release(releases: &[ReleaseInfo]) -> Option<String> {
    releases
        .iter()
        .filter(|r| r.active)
        .filter_map(|r| parse_release_version(&r.version).map(|v| (v, &r.version)))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, version)| version.clone())
}
