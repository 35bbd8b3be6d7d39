pub mod legacy;
pub mod loader;
pub mod metadata;
pub mod registry;
pub mod schema;
pub mod validator;

pub use loader::{
    decode_all, decode_document, decode_str, LoadReport, LoadedSkybox, SkippedDocument,
    SkyboxDocument,
};
pub use metadata::Metadata;
pub use registry::{
    builtin_registry, register_builtins, RegistryError, SkyboxTypeDescriptor, TypeRegistry,
    TypeRegistryBuilder,
};
pub use validator::{validate_entry, ValidationError};

use skyloom_core::SkyConfig;
use thiserror::Error;

/// Per-document decode failures. None of these abort a batch.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unknown skybox type '{0}'")]
    UnknownSkyboxType(String),
    #[error("Skybox type '{0}' does not support legacy schema version 1")]
    UnsupportedLegacySchema(String),
    #[error("Unsupported schema version {version} for skybox type '{type_name}'")]
    UnsupportedSchemaVersion { type_name: String, version: i64 },
    #[error("Malformed skybox document: {0}")]
    MalformedDocument(String),
}

impl DecodeError {
    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        DecodeError::MalformedDocument(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse sky config RON: {0}")]
    ParseError(String),
    #[error("minimum_alpha {0} must be a finite number strictly between 0.0 and 1.0")]
    InvalidMinimumAlpha(f32),
}

/// Parse runtime tuning from a RON string. Missing fields take defaults.
pub fn load_sky_config(ron_str: &str) -> Result<SkyConfig, ConfigError> {
    let options = ron::Options::default();
    let config: SkyConfig = options
        .from_str(ron_str)
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_sky_config(&config)?;
    Ok(config)
}

/// The visibility threshold must be a small positive value. At zero or
/// below, invisible entries would join the active set and never leave it.
pub fn validate_sky_config(config: &SkyConfig) -> Result<(), ConfigError> {
    let threshold = config.minimum_alpha;
    // NaN fails both comparisons
    if !(threshold > 0.0 && threshold < 1.0) {
        return Err(ConfigError::InvalidMinimumAlpha(threshold));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_sky_config() {
        let ron = r#"(
            minimum_alpha: 0.01,
            vision_blocking_effects: ["minecraft:blindness", "mymod:fog_blind"],
        )"#;
        let config = load_sky_config(ron).expect("should parse");
        assert_eq!(config.minimum_alpha, 0.01);
        assert_eq!(config.vision_blocking_effects.len(), 2);
        assert_eq!(
            config.vision_blocking_effects[1].to_string(),
            "mymod:fog_blind"
        );
    }

    #[test]
    fn test_load_sky_config_defaults() {
        let config = load_sky_config("()").expect("should parse");
        assert_eq!(config, SkyConfig::default());
    }

    #[test]
    fn test_malformed_config_rejected() {
        let result = load_sky_config("(minimum_alpha: \"high\")");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_minimum_alpha_must_be_positive() {
        for ron in [
            "(minimum_alpha: 0.0)",
            "(minimum_alpha: -0.5)",
            "(minimum_alpha: 1.0)",
        ] {
            assert!(
                matches!(load_sky_config(ron), Err(ConfigError::InvalidMinimumAlpha(_))),
                "accepted {ron}"
            );
        }
        assert!(load_sky_config("(minimum_alpha: 0.05)").is_ok());

        let nan = SkyConfig {
            minimum_alpha: f32::NAN,
            ..SkyConfig::default()
        };
        assert!(validate_sky_config(&nan).is_err());
    }
}
