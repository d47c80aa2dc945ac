//! CLI configuration stored at `~/.kaas/config.json`.
//!
//! The endpoint and token resolution chain (highest priority first):
//! 1. Explicit `--endpoint` / `--auth-token` flags
//! 2. `KAAS_ENDPOINT` / `KAAS_AUTH_TOKEN` environment variables (via clap)
//! 3. Values stored in the config file
//!
//! `KAAS_CONFIG` points at a different config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use kaas_definition::Limits;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const CONFIG_DIR_NAME: &str = ".kaas";
const CONFIG_FILE_NAME: &str = "config.json";
const KAAS_CONFIG_ENV: &str = "KAAS_CONFIG";
const DEFAULT_SCHEME: &str = "giantswarm";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Persistent CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct KaasConfig {
    /// API endpoint URL
    pub endpoint: Option<String>,
    /// Token stored by a previous login
    pub token: Option<String>,
    /// Authorization scheme, `giantswarm` or `Bearer`
    pub scheme: Option<String>,
    /// Per-request timeout
    pub timeout_secs: Option<u64>,
    /// Worker minimums of the installation
    #[serde(default)]
    pub limits: Limits,
}

impl KaasConfig {
    pub fn scheme(&self) -> &str {
        self.scheme.as_deref().unwrap_or(DEFAULT_SCHEME)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// The endpoint to talk to, preferring an explicit one
    pub fn resolve_endpoint(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .filter(|e| !e.is_empty())
            .or(self.endpoint.as_deref())
            .filter(|e| !e.is_empty())
            .map(|e| e.trim_end_matches('/').to_string())
            .ok_or(Error::EndpointMissing)
    }
}

/// Path to the config file, honoring `KAAS_CONFIG`.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(KAAS_CONFIG_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let home =
        dirs::home_dir().ok_or_else(|| Error::Other("could not determine home directory".into()))?;
    Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load config, returning default if the file is missing.
pub fn load_config() -> Result<KaasConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<KaasConfig> {
    if !path.exists() {
        return Ok(KaasConfig::default());
    }
    let data = std::fs::read_to_string(path)
        .map_err(|e| Error::config(path, format!("failed to read: {e}")))?;
    serde_json::from_str(&data).map_err(|e| Error::config(path, format!("failed to parse: {e}")))
}
