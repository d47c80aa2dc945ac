//! Error types for definition handling and cluster creation

use crate::api::ApiError;

/// Result type for kaas-definition operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving, validating or submitting a cluster definition
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The definition source could not be read
    #[error("could not read definition from {source_name}: {source}")]
    DefinitionNotReadable {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    /// The definition is not well-formed YAML
    #[error("could not parse cluster definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The definition is well-formed YAML but not a mapping
    #[error("invalid cluster definition: {0}")]
    InvalidDefinition(String),

    /// A merged definition or the arguments violate a constraint
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API rejected a call needed to create the cluster
    #[error("cluster creation failed: {0}")]
    Submission(#[from] ApiError),

    /// The request body could not be serialized
    #[error("could not create request body: {0}")]
    RequestBody(String),

    /// No active release exists to create the cluster with
    #[error("no active release available")]
    NoActiveRelease,

    /// The installation reported a provider this client does not know
    #[error("unknown provider: {0}, expected one of: aws, azure, kvm")]
    UnknownProvider(String),
}

impl Error {
    /// Create an invalid-definition error
    pub fn invalid_definition(msg: impl Into<String>) -> Self {
        Self::InvalidDefinition(msg.into())
    }

    /// Create a request-body error
    pub fn request_body(msg: impl Into<String>) -> Self {
        Self::RequestBody(msg.into())
    }

    /// True when the definition could not be read or decoded
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::DefinitionNotReadable { .. } | Error::Yaml(_) | Error::InvalidDefinition(_)
        )
    }

    /// The validation failure carried by this error, if any
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Constraint violations found by the validator.
///
/// Variants are reported in the order the validator checks them, so the first
/// failing rule is the one a caller sees.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("not logged in and no auth token given")]
    NotLoggedIn,

    #[error("conflicting flags: {reason}")]
    ConflictingFlags { reason: String },

    #[error("the number of workers cannot be combined with a minimum or maximum worker count")]
    ConflictingWorkerFlagsUsed,

    #[error("minimum worker count ({min}) must not exceed the maximum ({max})")]
    WorkersMinMaxInvalid { min: i64, max: i64 },

    #[error("at least {minimum} worker nodes are required")]
    NotEnoughWorkerNodes { minimum: i64 },

    #[error("at least {minimum} CPU cores per worker are required")]
    NotEnoughCpuCoresPerWorker { minimum: i64 },

    #[error("at least {minimum} GB of memory per worker are required")]
    NotEnoughMemoryPerWorker { minimum: f64 },

    #[error("at least {minimum} GB of storage per worker are required")]
    NotEnoughStoragePerWorker { minimum: f64 },

    #[error("incompatible settings: {reason}")]
    IncompatibleSettings { reason: String },

    #[error("no owner organization given")]
    ClusterOwnerMissing,

    #[error("'master' and 'master_nodes' cannot be used together")]
    MustProvideSingleMasterType,

    #[error("high availability masters are not supported by this installation or release")]
    HaMastersNotSupported,

    #[error("node pool '{node_pool}': give either an availability zone count or a zone list")]
    InvalidAvailabilityZones { node_pool: String },

    #[error("node pool '{node_pool}': on-demand capacity values must be a percentage from 0 to 100")]
    NotPercentage { node_pool: String },

    #[error("node pool '{node_pool}': spot instance max price requires spot instances to be enabled")]
    SpotMaxPriceWithoutSpotInstances { node_pool: String },
}

impl ValidationError {
    pub fn conflicting_flags(reason: impl Into<String>) -> Self {
        Self::ConflictingFlags {
            reason: reason.into(),
        }
    }

    pub fn incompatible(reason: impl Into<String>) -> Self {
        Self::IncompatibleSettings {
            reason: reason.into(),
        }
    }
}
