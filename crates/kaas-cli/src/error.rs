//! Error types for the CLI

use std::path::PathBuf;

use kaas_definition::{ApiError, ValidationError};

/// CLI Result type
pub type Result<T> = std::result::Result<T, Error>;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] kaas_definition::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("no API endpoint given")]
    EndpointMissing,

    #[error("could not set up HTTP client: {0}")]
    HttpClient(String),

    #[error("cluster created with errors")]
    CreatedWithErrors { id: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// A one-line headline plus an optional hint for the user
    pub fn headline_and_subtext(&self) -> (String, Option<String>) {
        use kaas_definition::Error as Def;

        match self {
            Error::Definition(Def::DefinitionNotReadable { source_name, .. }) => (
                "Could not read the cluster definition".to_string(),
                Some(format!("Please check that {source_name} exists and is readable.")),
            ),
            Error::Definition(Def::Yaml(e)) => (
                "Could not parse the cluster definition".to_string(),
                Some(format!("The YAML is not well-formed: {e}")),
            ),
            Error::Definition(Def::InvalidDefinition(msg)) => (
                "Could not parse the cluster definition".to_string(),
                Some(msg.clone()),
            ),
            Error::Definition(Def::Validation(v)) => validation_headline(v),
            Error::Definition(Def::Submission(api)) => api_headline(api),
            Error::Definition(Def::RequestBody(msg)) => (
                "Could not create the request body".to_string(),
                Some(msg.clone()),
            ),
            Error::Definition(Def::NoActiveRelease) => (
                "No active release available".to_string(),
                Some("Please give a release version with --release.".to_string()),
            ),
            Error::Definition(Def::UnknownProvider(p)) => (
                format!("Unsupported provider '{p}'"),
                Some("This installation uses a provider this client does not know.".to_string()),
            ),
            Error::EndpointMissing => (
                "No API endpoint given".to_string(),
                Some(
                    "Use --endpoint, set KAAS_ENDPOINT or add 'endpoint' to the config file."
                        .to_string(),
                ),
            ),
            Error::CreatedWithErrors { id } => (
                format!("Cluster '{id}' was created, but some steps failed"),
                Some("Check the node pools and labels of the cluster.".to_string()),
            ),
            other => (other.to_string(), None),
        }
    }
}

fn validation_headline(err: &ValidationError) -> (String, Option<String>) {
    let subtext = match err {
        ValidationError::NotLoggedIn => {
            Some("Please log in or pass a token with --auth-token.".to_string())
        }
        ValidationError::ConflictingFlags { .. } => Some(
            "Worker sizing flags can only be used without a definition file.".to_string(),
        ),
        ValidationError::ConflictingWorkerFlagsUsed => Some(
            "Use either --num-workers or --workers-min/--workers-max, not both.".to_string(),
        ),
        ValidationError::ClusterOwnerMissing => {
            Some("Please give an organization with --owner or in the definition.".to_string())
        }
        ValidationError::MustProvideSingleMasterType => Some(
            "Remove 'master' and use 'master_nodes' to configure the control plane.".to_string(),
        ),
        ValidationError::HaMastersNotSupported => Some(
            "Remove the high availability setting or pick a newer release.".to_string(),
        ),
        _ => None,
    };
    (capitalize(&err.to_string()), subtext)
}

fn api_headline(err: &ApiError) -> (String, Option<String>) {
    match err {
        ApiError::NotAuthorized => (
            "Not authorized".to_string(),
            Some("Your token may have expired. Please log in again.".to_string()),
        ),
        ApiError::Forbidden(_) => (
            "Access forbidden".to_string(),
            Some("You may not be a member of the owner organization.".to_string()),
        ),
        ApiError::Transport(msg) => (
            "Could not reach the API".to_string(),
            Some(msg.clone()),
        ),
        other => (
            "Could not create cluster".to_string(),
            Some(other.to_string()),
        ),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_missing_suggests_flag() {
        let err = Error::from(kaas_definition::Error::from(
            ValidationError::ClusterOwnerMissing,
        ));
        let (headline, subtext) = err.headline_and_subtext();
        assert_eq!(headline, "No owner organization given");
        assert!(subtext.unwrap().contains("--owner"));
    }

    #[test]
    fn unauthorized_submission_asks_for_login() {
        let err = Error::from(kaas_definition::Error::Submission(ApiError::NotAuthorized));
        let (headline, subtext) = err.headline_and_subtext();
        assert_eq!(headline, "Not authorized");
        assert!(subtext.unwrap().contains("log in"));
    }

    #[test]
    fn other_errors_fall_back_to_display() {
        let (headline, subtext) = Error::Other("boom".to_string()).headline_and_subtext();
        assert_eq!(headline, "boom");
        assert!(subtext.is_none());
    }
}
