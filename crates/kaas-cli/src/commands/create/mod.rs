//! Create command - create resources on a KaaS installation

pub mod cluster;

use clap::{Args, Subcommand};

use crate::{GlobalArgs, Result};

/// Create resources
#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(subcommand)]
    pub resource: CreateResource,
}

/// Resource to create
#[derive(Subcommand, Debug)]
pub enum CreateResource {
    /// Create a cluster from a definition file, flags, or both
    Cluster(cluster::ClusterArgs),
}

/// Run the create command
pub async fn run(args: CreateArgs, global: &GlobalArgs) -> Result<()> {
    match args.resource {
        CreateResource::Cluster(cluster_args) => cluster::run(cluster_args, global).await,
    }
}
