//! Typed cluster definitions
//!
//! A definition is written by users in one of two schema generations. The v4
//! schema describes a flat list of worker groups; v5 describes node pools and
//! is marked by the presence of an `api_version` key. Both decode into
//! [`Definition`] so that downstream code branches on the schema once.

use serde::{Deserialize, Serialize};

pub mod v4;
pub mod v5;

pub use v4::{
    AwsWorkerDefinition, AzureWorkerDefinition, ClusterDefinitionV4, CpuDefinition,
    MemoryDefinition, NodeDefinition, StorageDefinition,
};
pub use v5::{
    AvailabilityZonesDefinition, AwsNodeSpec, AzureNodeSpec, AzureSpotInstances,
    ClusterDefinitionV5, InstanceDistribution, MasterDefinition, MasterNodes, MasterNodesAzure,
    NodePoolDefinition, NodeSpec,
};

/// Worker count used when neither a definition nor flags give one
pub const DEFAULT_WORKER_COUNT: i64 = 3;

/// Schema generation of a cluster definition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    V4,
    V5,
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V4 => write!(f, "v4"),
            Self::V5 => write!(f, "v5"),
        }
    }
}

/// Autoscaling envelope for a cluster or node pool
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ScalingDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl ScalingDefinition {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Returns `(min, max)` when both are set and min exceeds max
    pub fn inverted(&self) -> Option<(i64, i64)> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Some((min, max)),
            _ => None,
        }
    }
}

/// A decoded cluster definition of either schema
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Definition {
    V4(ClusterDefinitionV4),
    V5(ClusterDefinitionV5),
}

impl Definition {
    /// An empty definition of the given schema
    pub fn empty(schema: SchemaVersion) -> Self {
        match schema {
            SchemaVersion::V4 => Definition::V4(ClusterDefinitionV4::default()),
            SchemaVersion::V5 => Definition::V5(ClusterDefinitionV5::default()),
        }
    }

    pub fn schema_version(&self) -> SchemaVersion {
        match self {
            Definition::V4(_) => SchemaVersion::V4,
            Definition::V5(_) => SchemaVersion::V5,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Definition::V4(d) => &d.name,
            Definition::V5(d) => &d.name,
        }
    }

    pub fn owner(&self) -> &str {
        match self {
            Definition::V4(d) => &d.owner,
            Definition::V5(d) => &d.owner,
        }
    }

    pub fn release_version(&self) -> &str {
        match self {
            Definition::V4(d) => &d.release_version,
            Definition::V5(d) => &d.release_version,
        }
    }

    pub fn set_release_version(&mut self, release: impl Into<String>) {
        match self {
            Definition::V4(d) => d.release_version = release.into(),
            Definition::V5(d) => d.release_version = release.into(),
        }
    }
}

/// Lenient deserializers shared by both schemas.
///
/// Hand-written definitions often leave a key without a value or write an
/// availability zone as a bare number (`zones: [1, 2, 3]` on Azure). These
/// helpers accept both without failing the whole document.
pub(crate) mod de {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
        Bool(bool),
    }

    impl Scalar {
        fn into_string(self) -> String {
            match self {
                Scalar::Text(s) => s,
                Scalar::Integer(i) => i.to_string(),
                Scalar::Float(f) => f.to_string(),
                Scalar::Bool(b) => b.to_string(),
            }
        }
    }

    /// A scalar as a string; null becomes the empty string
    pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Scalar>::deserialize(deserializer)?
            .map(Scalar::into_string)
            .unwrap_or_default())
    }

    /// A release version. Unquoted values such as `1.10` are read by YAML as
    /// floats and lose digits, so only strings and integers are accepted.
    pub fn release_version<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Scalar>::deserialize(deserializer)? {
            Some(Scalar::Float(f)) => Err(serde::de::Error::custom(format!(
                "release_version must be a quoted string, got the number {f}"
            ))),
            other => Ok(other.map(Scalar::into_string).unwrap_or_default()),
        }
    }

    /// A list of scalars as strings; null becomes the empty list
    pub fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Vec<Scalar>>::deserialize(deserializer)?
            .unwrap_or_default()
            .into_iter()
            .map(Scalar::into_string)
            .collect())
    }

    /// A label map with scalar values as strings
    pub fn lenient_labels<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<BTreeMap<String, Scalar>>::deserialize(deserializer)?
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.into_string()))
            .collect())
    }

    /// Like [`lenient_labels`], keeping null values as removals
    pub fn lenient_optional_labels<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(
            Option::<BTreeMap<String, Option<Scalar>>>::deserialize(deserializer)?
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| (k, v.map(Scalar::into_string)))
                .collect(),
        )
    }

    /// Any value; null becomes its default
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_reports_inverted_envelope() {
        assert_eq!(ScalingDefinition::new(5, 3).inverted(), Some((5, 3)));
        assert_eq!(ScalingDefinition::new(3, 3).inverted(), None);
        let only_min = ScalingDefinition {
            min: Some(9),
            max: None,
        };
        assert_eq!(only_min.inverted(), None);
    }

    #[test]
    fn accessors_read_through_either_schema() {
        let mut v4 = Definition::V4(ClusterDefinitionV4 {
            owner: "acme".to_string(),
            ..Default::default()
        });
        v4.set_release_version("9.0.0");
        assert_eq!(v4.owner(), "acme");
        assert_eq!(v4.release_version(), "9.0.0");
        assert_eq!(v4.schema_version(), SchemaVersion::V4);

        let v5 = Definition::empty(SchemaVersion::V5);
        assert_eq!(v5.schema_version(), SchemaVersion::V5);
        assert_eq!(v5.name(), "");
    }
}
