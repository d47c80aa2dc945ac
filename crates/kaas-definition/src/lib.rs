//! Cluster definition handling for KaaS installations
//!
//! This crate turns a YAML cluster definition, command-line arguments, or both
//! into one validated cluster specification and the request bodies that create
//! it. Two schema generations are supported: v4 with a flat worker list and v5
//! with node pools.
//!
//! The pipeline is:
//! - [`sniff`] / [`decode`]: detect the schema and decode into a [`Definition`]
//! - [`overlay`]: merge flag values from [`Arguments`] into the definition
//! - [`validate`]: check the merged definition against the [`Installation`]
//! - [`request`]: build wire-format bodies
//! - [`create`]: run all of the above and submit through a [`ClusterApi`]

pub mod api;
pub mod arguments;
pub mod capabilities;
pub mod create;
pub mod decode;
pub mod definition;
pub mod error;
pub mod installation;
pub mod limits;
pub mod overlay;
pub mod provider;
pub mod request;
pub mod sniff;
pub mod validate;

pub use api::{ApiError, ClusterApi};
pub use arguments::Arguments;
pub use create::{ClusterCreator, CreationOutcome, CreationResult, SubStep, SubStepFailure};
pub use decode::{decode, read_definition, DefinitionSource};
pub use definition::{Definition, SchemaVersion};
pub use error::{Error, Result, ValidationError};
pub use installation::Installation;
pub use limits::Limits;
pub use provider::Provider;
pub use request::{build_request, ClusterRequest, Preview};
