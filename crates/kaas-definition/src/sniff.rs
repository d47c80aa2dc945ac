//! Schema detection for raw definition documents

use serde_yaml::Value;

use crate::definition::SchemaVersion;
use crate::{Error, Result};

/// Key whose presence marks a v5 definition
pub const API_VERSION_KEY: &str = "api_version";

/// Parse `bytes` loosely and decide which schema they use.
///
/// The parsed document is returned alongside the version so callers decode
/// it without parsing the input again. An empty document is a v4 definition
/// with no fields set. The value of `api_version` is not inspected.
pub fn sniff(bytes: &[u8]) -> Result<(SchemaVersion, Value)> {
    let value: Value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_yaml::from_slice(bytes)?
    };
    let version = sniff_value(&value)?;
    Ok((version, value))
}

/// Schema of an already parsed document
pub fn sniff_value(value: &Value) -> Result<SchemaVersion> {
    match value {
        Value::Null => Ok(SchemaVersion::V4),
        Value::Mapping(map) if map.contains_key(API_VERSION_KEY) => Ok(SchemaVersion::V5),
        Value::Mapping(_) => Ok(SchemaVersion::V4),
        Value::Tagged(tagged) => sniff_value(&tagged.value),
        other => Err(Error::invalid_definition(format!(
            "could not unmarshal definition into a map, found {}",
            kind(other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        _ => "an unsupported value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_version_key_marks_v5() {
        let (v, _) = sniff(b"api_version: v5\nowner: acme\n").unwrap();
        assert_eq!(v, SchemaVersion::V5);
    }

    #[test]
    fn api_version_value_is_not_inspected() {
        let (v, _) = sniff(b"api_version:\n").unwrap();
        assert_eq!(v, SchemaVersion::V5);
        let (v, _) = sniff(b"api_version: banana\n").unwrap();
        assert_eq!(v, SchemaVersion::V5);
    }

    #[test]
    fn mapping_without_marker_is_v4() {
        let (v, _) = sniff(b"owner: acme\nworkers: []\n").unwrap();
        assert_eq!(v, SchemaVersion::V4);
    }

    #[test]
    fn empty_document_is_v4() {
        assert_eq!(sniff(b"").unwrap().0, SchemaVersion::V4);
        assert_eq!(sniff(b"  \n").unwrap().0, SchemaVersion::V4);
    }

    #[test]
    fn json_input_is_accepted() {
        let (v, _) = sniff(br#"{"api_version": "v5", "owner": "acme"}"#).unwrap();
        assert_eq!(v, SchemaVersion::V5);
    }

    #[test]
    fn bad_indentation_is_a_decode_error() {
        let err = sniff(b"owner: acme\n  workers:\n - cpu: 1\n").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
        assert!(err.is_decode());
    }

    #[test]
    fn non_mapping_document_is_a_decode_error() {
        let err = sniff(b"just a string\n").unwrap_err();
        assert!(matches!(err, Error::InvalidDefinition(_)));
        let err = sniff(b"- a\n- b\n").unwrap_err();
        assert!(err.is_decode());
    }
}
