use serde::Deserialize;
use serde_json::Value;
use skyloom_core::constants::SKYLOOM_NAMESPACE;

use crate::DecodeError;

/// Document header read before type dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(rename = "type")]
    pub type_name: String,
    pub schema_version: i64,
}

impl Metadata {
    pub fn from_value(document: &Value) -> Result<Self, DecodeError> {
        Metadata::deserialize(document).map_err(DecodeError::malformed)
    }

    /// Versions below 2 are the flat legacy layout.
    pub fn is_legacy(&self) -> bool {
        self.schema_version < 2
    }
}

/// Canonical lookup form of a type name: lower case, `-` separators, no
/// `skyloom:` prefix. `Square_Textured` and `skyloom:square-textured`
/// both become `square-textured`.
pub fn normalize_type_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let bare = trimmed
        .strip_prefix(SKYLOOM_NAMESPACE)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(trimmed);
    bare.to_ascii_lowercase().replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_header() {
        let doc = json!({ "type": "monocolor", "schemaVersion": 2, "properties": {} });
        let meta = Metadata::from_value(&doc).expect("valid header");
        assert_eq!(meta.type_name, "monocolor");
        assert_eq!(meta.schema_version, 2);
        assert!(!meta.is_legacy());
    }

    #[test]
    fn test_missing_version_is_malformed() {
        let doc = json!({ "type": "monocolor" });
        assert!(matches!(
            Metadata::from_value(&doc),
            Err(DecodeError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_non_object_is_malformed() {
        assert!(Metadata::from_value(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_type_name("mono_color_skybox"), "mono-color-skybox");
        assert_eq!(normalize_type_name("mono-color-skybox"), "mono-color-skybox");
        assert_eq!(normalize_type_name("skyloom:Square_Textured"), "square-textured");
        assert_eq!(normalize_type_name("other:square"), "other:square");
    }
}
