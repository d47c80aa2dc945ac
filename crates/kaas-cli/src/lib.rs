//! KaaS CLI library

pub mod client;
pub mod commands;
pub mod config;
pub mod error;

pub use error::{Error, Result};

use clap::{Args, Parser, Subcommand};

/// kaas - Create and manage clusters on a KaaS installation
#[derive(Parser, Debug)]
#[command(name = "kaas")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// API endpoint URL (overrides the config file)
    #[arg(long, env = "KAAS_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Token to authenticate with (overrides the stored one)
    #[arg(long, env = "KAAS_AUTH_TOKEN", global = true, hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Print more information, including the submitted definition
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create resources
    Create(commands::create::CreateArgs),
}

impl Cli {
    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Create(args) => commands::create::run(args, &self.global).await,
        }
    }
}
