//! Reading and decoding definition documents

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::definition::{Definition, SchemaVersion};
use crate::sniff::sniff;
use crate::{Error, Result};

/// Where a definition document comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefinitionSource {
    File(PathBuf),
    Stdin,
    Bytes(Vec<u8>),
}

impl DefinitionSource {
    /// Interpret a `--file` flag value, where `-` means standard input
    pub fn from_flag(value: &str) -> Self {
        if value == "-" {
            DefinitionSource::Stdin
        } else {
            DefinitionSource::File(PathBuf::from(value))
        }
    }

    fn describe(&self) -> String {
        match self {
            DefinitionSource::File(path) => path.display().to_string(),
            DefinitionSource::Stdin => "standard input".to_string(),
            DefinitionSource::Bytes(_) => "memory".to_string(),
        }
    }
}

/// Decode a definition document of either schema.
///
/// Unknown keys are ignored and missing keys are left unset. Only structural
/// problems are errors; a document using the "wrong" schema for the target
/// installation is caught later by validation.
pub fn decode(bytes: &[u8]) -> Result<Definition> {
    let (version, value) = sniff(bytes)?;
    debug!(schema = %version, "decoding cluster definition");
    let definition = match (version, value) {
        (_, serde_yaml::Value::Null) => Definition::empty(version),
        (SchemaVersion::V4, value) => Definition::V4(serde_yaml::from_value(value)?),
        (SchemaVersion::V5, value) => Definition::V5(serde_yaml::from_value(value)?),
    };
    Ok(definition)
}

/// Read the whole source, then decode it
pub fn read_definition(source: &DefinitionSource) -> Result<Definition> {
    let bytes = match source {
        DefinitionSource::File(path) => read_file(path)?,
        DefinitionSource::Stdin => {
            let mut buf = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .map_err(|e| not_readable(source, e))?;
            buf
        }
        DefinitionSource::Bytes(bytes) => bytes.clone(),
    };
    decode(&bytes)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| not_readable(&DefinitionSource::File(path.to_path_buf()), e))
}

fn not_readable(source: &DefinitionSource, err: std::io::Error) -> Error {
    Error::DefinitionNotReadable {
        source_name: source.describe(),
        source: err,
    }
}
