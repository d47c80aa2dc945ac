//! Infrastructure providers a KaaS installation can run on

use serde::{Deserialize, Serialize};

/// The cloud or on-premises provider of an installation
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Amazon Web Services
    #[default]
    Aws,
    /// Microsoft Azure
    Azure,
    /// On-premises KVM
    Kvm,
}

impl Provider {
    /// Returns true if this provider is a public cloud
    pub fn is_cloud(&self) -> bool {
        matches!(self, Self::Aws | Self::Azure)
    }
}

impl std::str::FromStr for Provider {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "azure" => Ok(Self::Azure),
            "kvm" => Ok(Self::Kvm),
            _ => Err(crate::Error::UnknownProvider(s.to_string())),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aws => write!(f, "aws"),
            Self::Azure => write!(f, "azure"),
            Self::Kvm => write!(f, "kvm"),
        }
    }
}
