//! `kaas create cluster` - create a cluster from a definition file, flags, or both.
//!
//! # Usage
//!
//! ```bash
//! # From flags only
//! kaas create cluster --owner acme --name dev --num-workers 3
//!
//! # From a definition file, overriding its name
//! kaas create cluster -f cluster.yaml --name staging
//!
//! # Show what would be sent
//! kaas create cluster -f cluster.yaml --dry-run
//! ```

use std::io::Write;

use clap::{ArgAction, Args};
use kaas_definition::{
    Arguments, ClusterApi, ClusterCreator, CreationOutcome, CreationResult, Limits, Preview,
};
use serde::Serialize;

use crate::client::RestClient;
use crate::commands::OutputFormat;
use crate::config::{self, KaasConfig};
use crate::{Error, GlobalArgs, Result};

/// Create a new cluster
#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Path to a cluster definition file, or `-` for standard input
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Cluster name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Organization owning the cluster
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Release version to use (default: latest active release)
    #[arg(short, long)]
    pub release: Option<String>,

    /// Number of availability zones for v4 clusters
    #[arg(long)]
    pub availability_zones: Option<i64>,

    /// Number of workers, sets both minimum and maximum
    #[arg(long)]
    pub num_workers: Option<i64>,

    /// Minimum number of workers
    #[arg(long)]
    pub workers_min: Option<i64>,

    /// Maximum number of workers
    #[arg(long)]
    pub workers_max: Option<i64>,

    /// CPU cores per worker (KVM)
    #[arg(long = "num-cpus")]
    pub num_cpus: Option<i64>,

    /// Memory per worker in GB (KVM)
    #[arg(long = "memory-gb")]
    pub memory_gb: Option<f64>,

    /// Storage per worker in GB (KVM)
    #[arg(long = "storage-gb")]
    pub storage_gb: Option<f64>,

    /// EC2 instance type of workers (AWS)
    #[arg(long = "aws-instance-type")]
    pub aws_instance_type: Option<String>,

    /// VM size of workers (Azure)
    #[arg(long = "azure-vm-size")]
    pub azure_vm_size: Option<String>,

    /// Run three master nodes instead of one
    #[arg(
        long = "master-ha",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub master_ha: Option<bool>,

    /// Create a default node pool when the definition has none
    #[arg(
        long = "create-default-nodepool",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub create_default_nodepool: bool,

    /// Validate and print the request without creating anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

impl ClusterArgs {
    /// Combine command flags with global flags and the stored token
    pub fn to_arguments(&self, global: &GlobalArgs, config: &KaasConfig) -> Arguments {
        Arguments {
            auth_token: config.token.clone(),
            user_provided_token: global.auth_token.clone(),
            cluster_name: self.name.clone(),
            owner: self.owner.clone(),
            release_version: self.release.clone(),
            availability_zones: self.availability_zones,
            num_workers: self.num_workers,
            workers_min: self.workers_min,
            workers_max: self.workers_max,
            worker_num_cpus: self.num_cpus,
            worker_memory_size_gb: self.memory_gb,
            worker_storage_size_gb: self.storage_gb,
            worker_aws_ec2_instance_type: self.aws_instance_type.clone(),
            worker_azure_vm_size: self.azure_vm_size.clone(),
            master_ha: self.master_ha,
            create_default_node_pool: self.create_default_nodepool,
            input_yaml_file: self.file.clone(),
            dry_run: self.dry_run,
            verbose: global.verbose,
        }
    }
}

/// Run the create cluster command.
pub async fn run(args: ClusterArgs, global: &GlobalArgs) -> Result<()> {
    let config = config::load_config()?;
    let endpoint = config.resolve_endpoint(global.endpoint.as_deref())?;
    let arguments = args.to_arguments(global, &config);
    let client = RestClient::new(
        &endpoint,
        config.scheme(),
        arguments.token(),
        config.timeout(),
    )?;

    let mut stdout = std::io::stdout();
    execute(&client, &arguments, config.limits, args.output, &mut stdout).await
}

async fn execute<A: ClusterApi + ?Sized>(
    api: &A,
    arguments: &Arguments,
    limits: Limits,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = ClusterCreator::new(api)
        .with_limits(limits)
        .create(arguments)
        .await;
    report(outcome, output, arguments.verbose, out)
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
enum ResultKind {
    Created,
    CreatedWithErrors,
    DryRun,
    Error,
}

/// Machine-readable summary printed with `--output json`
#[derive(Debug, Serialize)]
struct JsonOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    result: ResultKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn report(
    outcome: kaas_definition::Result<CreationOutcome>,
    output: OutputFormat,
    verbose: bool,
    out: &mut impl Write,
) -> Result<()> {
    match outcome {
        Ok(CreationOutcome::DryRun(preview)) => match output {
            OutputFormat::Text => print_preview(&preview, out),
            OutputFormat::Json => print_json(
                &JsonOutput {
                    id: None,
                    result: ResultKind::DryRun,
                    error: None,
                },
                out,
            ),
        },
        Ok(CreationOutcome::Created(result)) => {
            match output {
                OutputFormat::Text => print_created(&result, verbose, out)?,
                OutputFormat::Json => print_json(&created_json(&result), out)?,
            }
            if result.has_errors() {
                return Err(Error::CreatedWithErrors { id: result.id });
            }
            Ok(())
        }
        Err(err) => {
            if output == OutputFormat::Json {
                print_json(
                    &JsonOutput {
                        id: None,
                        result: ResultKind::Error,
                        error: Some(err.to_string()),
                    },
                    out,
                )?;
            }
            Err(err.into())
        }
    }
}

fn created_json(result: &CreationResult) -> JsonOutput {
    let error = (!result.failures.is_empty()).then(|| {
        result
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.step, f.error))
            .collect::<Vec<_>>()
            .join("; ")
    });
    JsonOutput {
        id: Some(result.id.clone()),
        result: if result.has_errors() {
            ResultKind::CreatedWithErrors
        } else {
            ResultKind::Created
        },
        error,
    }
}

fn print_preview(preview: &Preview, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "Dry run, no cluster created. Schema {} request:",
        preview.definition.schema_version()
    )?;
    writeln!(out)?;
    write!(out, "{}", preview.to_yaml()?)?;
    Ok(())
}

fn print_created(result: &CreationResult, verbose: bool, out: &mut impl Write) -> Result<()> {
    let name = result.definition.name();
    if name.is_empty() {
        writeln!(out, "New cluster '{}' is launching.", result.id)?;
    } else {
        writeln!(out, "New cluster '{}' ({}) is launching.", result.id, name)?;
    }
    if let Some(location) = &result.location {
        writeln!(out, "Location: {location}")?;
    }
    for failure in &result.failures {
        writeln!(out, "Warning: {} failed: {}", failure.step, failure.error)?;
    }
    if verbose {
        writeln!(out)?;
        write!(out, "{}", Preview::new(result.definition.clone()).to_yaml()?)?;
    }
    Ok(())
}

fn print_json(output: &JsonOutput, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, output)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clap::Parser;
    use kaas_definition::api::{
        ApiError, CreatedCluster, CreatedNodePool, InstallationInfo, ReleaseInfo,
    };
    use kaas_definition::request::{
        AddClusterRequestV4, AddClusterRequestV5, AddNodePoolRequest, SetClusterLabelsRequest,
    };
    use kaas_definition::{Provider, ValidationError};
    use mockall::mock;

    use crate::{Cli, Commands};

    mock! {
        pub Api {}

        #[async_trait]
        impl ClusterApi for Api {
            async fn get_info(&self) -> std::result::Result<InstallationInfo, ApiError>;
            async fn list_releases(&self) -> std::result::Result<Vec<ReleaseInfo>, ApiError>;
            async fn create_cluster_v4(
                &self,
                body: &AddClusterRequestV4,
            ) -> std::result::Result<CreatedCluster, ApiError>;
            async fn create_cluster_v5(
                &self,
                body: &AddClusterRequestV5,
            ) -> std::result::Result<String, ApiError>;
            async fn create_node_pool(
                &self,
                cluster_id: &str,
                body: &AddNodePoolRequest,
            ) -> std::result::Result<CreatedNodePool, ApiError>;
            async fn update_cluster_labels(
                &self,
                cluster_id: &str,
                body: &SetClusterLabelsRequest,
            ) -> std::result::Result<(), ApiError>;
        }
    }

    fn cluster_args(argv: &[&str]) -> (ClusterArgs, GlobalArgs) {
        let mut full = vec!["kaas", "create", "cluster"];
        full.extend_from_slice(argv);
        let cli = Cli::try_parse_from(full).unwrap();
        let Commands::Create(create) = cli.command;
        let crate::commands::create::CreateResource::Cluster(args) = create.resource;
        (args, cli.global)
    }

    fn aws_api(release_minimum: &str) -> MockApi {
        let mut api = MockApi::new();
        let minimum = release_minimum.to_string();
        api.expect_get_info().returning(move || {
            Ok(InstallationInfo {
                provider: Provider::Aws,
                node_pools_release_minimum: Some(minimum.clone()),
            })
        });
        api
    }

    fn logged_in() -> KaasConfig {
        KaasConfig {
            token: Some("stored".to_string()),
            ..Default::default()
        }
    }

    // =========================================================================
    // Story: flags map onto creation arguments
    // =========================================================================

    #[test]
    fn flags_are_carried_into_arguments() {
        let (args, global) = cluster_args(&[
            "-o",
            "acme",
            "-n",
            "dev",
            "--workers-min",
            "2",
            "--workers-max",
            "4",
            "--memory-gb",
            "7.5",
            "--dry-run",
        ]);
        let arguments = args.to_arguments(&global, &logged_in());

        assert_eq!(arguments.owner(), Some("acme"));
        assert_eq!(arguments.cluster_name(), Some("dev"));
        assert_eq!(arguments.workers_min(), Some(2));
        assert_eq!(arguments.workers_max(), Some(4));
        assert_eq!(arguments.worker_memory_size_gb(), Some(7.5));
        assert_eq!(arguments.token(), Some("stored"));
        assert!(arguments.dry_run);
        assert!(arguments.create_default_node_pool);
        assert_eq!(arguments.master_ha, None);
    }

    #[test]
    fn explicit_token_wins_over_stored_one() {
        let cli = Cli::try_parse_from([
            "kaas",
            "--auth-token",
            "flag",
            "create",
            "cluster",
            "-o",
            "acme",
        ])
        .unwrap();
        let Commands::Create(create) = cli.command;
        let crate::commands::create::CreateResource::Cluster(args) = create.resource;
        let arguments = args.to_arguments(&cli.global, &logged_in());
        assert_eq!(arguments.token(), Some("flag"));
    }

    #[test]
    fn master_ha_takes_an_optional_value() {
        let (bare, _) = cluster_args(&["--master-ha"]);
        assert_eq!(bare.master_ha, Some(true));

        let (off, _) = cluster_args(&["--master-ha=false"]);
        assert_eq!(off.master_ha, Some(false));
    }

    #[test]
    fn default_node_pool_can_be_disabled() {
        let (args, _) = cluster_args(&["--create-default-nodepool=false"]);
        assert!(!args.create_default_nodepool);

        let (args, _) = cluster_args(&[]);
        assert!(args.create_default_nodepool);
    }

    // =========================================================================
    // Story: outcomes are reported as text or JSON
    // =========================================================================

    #[tokio::test]
    async fn created_cluster_is_reported_in_text() {
        let mut api = aws_api("9.0.0");
        api.expect_create_cluster_v5()
            .times(1)
            .returning(|_| Ok("x7k2q".to_string()));
        api.expect_create_node_pool().times(1).returning(|_, _| {
            Ok(CreatedNodePool {
                id: "np1".to_string(),
                name: "Unnamed node pool".to_string(),
            })
        });

        let (args, global) = cluster_args(&["-o", "acme", "-n", "dev", "-r", "11.0.0"]);
        let arguments = args.to_arguments(&global, &logged_in());
        let mut out = Vec::new();
        execute(
            &api,
            &arguments,
            Limits::default(),
            OutputFormat::Text,
            &mut out,
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("New cluster 'x7k2q' (dev) is launching."));
    }

    #[tokio::test]
    async fn dry_run_prints_request_and_creates_nothing() {
        let api = aws_api("9.0.0");

        let (args, global) = cluster_args(&["-o", "acme", "-r", "8.5.0", "--dry-run"]);
        let arguments = args.to_arguments(&global, &logged_in());
        let mut out = Vec::new();
        execute(
            &api,
            &arguments,
            Limits::default(),
            OutputFormat::Text,
            &mut out,
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Dry run, no cluster created. Schema v4 request:"));
        assert!(text.contains("owner: acme"));
    }

    #[tokio::test]
    async fn failed_node_pool_is_created_with_errors_in_json() {
        let mut api = aws_api("9.0.0");
        api.expect_create_cluster_v5()
            .returning(|_| Ok("x7k2q".to_string()));
        api.expect_create_node_pool()
            .returning(|_, _| Err(ApiError::Server {
                status: 500,
                message: "boom".to_string(),
            }));

        let (args, global) = cluster_args(&["-o", "acme", "-r", "11.0.0"]);
        let arguments = args.to_arguments(&global, &logged_in());
        let mut out = Vec::new();
        let err = execute(
            &api,
            &arguments,
            Limits::default(),
            OutputFormat::Json,
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::CreatedWithErrors { ref id } if id == "x7k2q"));
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["id"], "x7k2q");
        assert_eq!(json["result"], "created-with-errors");
        assert!(json["error"].as_str().unwrap().contains("default node pool"));
    }

    #[tokio::test]
    async fn missing_token_is_reported_without_api_calls() {
        let api = MockApi::new();

        let (args, global) = cluster_args(&["-o", "acme"]);
        let arguments = args.to_arguments(&global, &KaasConfig::default());
        let mut out = Vec::new();
        let err = execute(
            &api,
            &arguments,
            Limits::default(),
            OutputFormat::Json,
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Definition(kaas_definition::Error::Validation(
                ValidationError::NotLoggedIn
            ))
        ));
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["result"], "error");
        assert!(json.get("id").is_none());
    }
}
