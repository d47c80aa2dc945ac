//! Release-dependent feature detection
//!
//! Whether a feature is available depends on the installation's provider and
//! on the release a cluster is created with. Each [`Capability`] lists the
//! minimum release per provider; a provider that is not listed never has it.

use semver::Version;

use crate::provider::Provider;

/// A feature and the releases from which each provider supports it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capability {
    pub name: &'static str,
    pub required_release_per_provider: Vec<(Provider, Version)>,
}

impl Capability {
    /// True if `release` on `provider` offers this capability
    pub fn is_supported(&self, provider: Provider, release: &Version) -> bool {
        self.required_release_per_provider
            .iter()
            .any(|(p, minimum)| *p == provider && release >= minimum)
    }
}

/// Node pools (v5 clusters)
pub fn node_pools() -> Capability {
    Capability {
        name: "NodePools",
        required_release_per_provider: vec![(Provider::Aws, Version::new(9, 0, 0))],
    }
}

/// High-availability control planes
pub fn ha_masters() -> Capability {
    Capability {
        name: "HAMasters",
        required_release_per_provider: vec![(Provider::Aws, Version::new(11, 5, 0))],
    }
}

/// Workers spread over several availability zones
pub fn availability_zones() -> Capability {
    Capability {
        name: "AvailabilityZones",
        required_release_per_provider: vec![(Provider::Aws, Version::new(6, 1, 0))],
    }
}

/// Worker autoscaling between a minimum and maximum
pub fn autoscaling() -> Capability {
    Capability {
        name: "Autoscaling",
        required_release_per_provider: vec![(Provider::Aws, Version::new(6, 3, 0))],
    }
}

/// The capabilities this client checks, with installation overrides applied
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub node_pools: Capability,
    pub ha_masters: Capability,
    pub availability_zones: Capability,
    pub autoscaling: Capability,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            node_pools: node_pools(),
            ha_masters: ha_masters(),
            availability_zones: availability_zones(),
            autoscaling: autoscaling(),
        }
    }
}

impl Capabilities {
    /// Replace the node pool minimum for `provider` with the one an
    /// installation publishes.
    pub fn with_node_pools_minimum(mut self, provider: Provider, minimum: Version) -> Self {
        self.node_pools
            .required_release_per_provider
            .retain(|(p, _)| *p != provider);
        self.node_pools
            .required_release_per_provider
            .push((provider, minimum));
        self
    }

    /// Names of every capability `release` on `provider` offers
    pub fn supported(&self, provider: Provider, release: &Version) -> Vec<&'static str> {
        [
            &self.autoscaling,
            &self.availability_zones,
            &self.node_pools,
            &self.ha_masters,
        ]
        .into_iter()
        .filter(|c| c.is_supported(provider, release))
        .map(|c| c.name)
        .collect()
    }
}

/// Parse a release version, accepting a leading `v` and missing minor or
/// patch components (`"9"` is `9.0.0`).
pub fn parse_release_version(s: &str) -> Option<Version> {
    let s = s.trim().trim_start_matches('v');
    if let Ok(v) = Version::parse(s) {
        return Some(v);
    }
    let parts = s.split('.').collect::<Vec<_>>();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part.parse().ok()?;
    }
    Some(Version::new(numbers[0], numbers[1], numbers[2]))
}
