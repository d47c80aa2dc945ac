//! What is known about the target installation for one invocation

use semver::Version;

use crate::capabilities::{parse_release_version, Capabilities, Capability};
use crate::limits::Limits;
use crate::provider::Provider;

/// Provider, release and limits the definition is validated against
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Installation {
    pub provider: Provider,
    /// Release the cluster will be created with, when it is a valid version
    pub release: Option<Version>,
    pub capabilities: Capabilities,
    pub limits: Limits,
}

impl Installation {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            ..Default::default()
        }
    }

    pub fn with_release(mut self, release: &str) -> Self {
        self.release = parse_release_version(release);
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn supports_node_pools(&self) -> bool {
        self.supports(&self.capabilities.node_pools)
    }

    pub fn supports_ha_masters(&self) -> bool {
        self.supports(&self.capabilities.ha_masters)
    }

    pub fn supports_availability_zones(&self) -> bool {
        self.supports(&self.capabilities.availability_zones)
    }

    pub fn supports_autoscaling(&self) -> bool {
        self.supports(&self.capabilities.autoscaling)
    }

    /// Names of the capabilities the release offers, empty when it is unknown
    pub fn supported_capabilities(&self) -> Vec<&'static str> {
        self.release
            .as_ref()
            .map(|r| self.capabilities.supported(self.provider, r))
            .unwrap_or_default()
    }

    fn supports(&self, capability: &Capability) -> bool {
        self.release
            .as_ref()
            .is_some_and(|r| capability.is_supported(self.provider, r))
    }
}
